// THEORY:
// The `CutAngleOptimizer` decides where the knife goes. Given a label accessor
// over the classified image it:
//
// 1.  **Finds the center**: the floored mean position of every pixel that is not
//     `NotPizza`. An image with no pizza has no center and is reported as
//     `CutError::EmptyClassification`.
// 2.  **Sizes the rays**: the cast radius is the floored distance from the center
//     to the farthest image corner, long enough for any ray to leave the image.
// 3.  **Searches the rotation**: `cuts` diametric cuts form 2*cuts rays spaced
//     360/(2*cuts) degrees apart, so only offsets in [0, 360/(2*cuts)) are
//     distinct. Every offset is scored by the number of topping samples under
//     all of its rays, and the lowest score wins. Ties keep the earliest offset.
//
// A ray stops counting once it has seen `blank_tolerance` background samples in a
// row: it has left the pizza and anything beyond is not on the plate.
//
// The search is a brute force over at most 180 offsets; each offset is scored
// independently, so the work can be split by offset range and reduced afterwards.

use std::ops::Range;

use log::{debug, info};

use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::ray::{Point, Ray, RayStep, RayVisitor, angle_steps, ray_angles};
use crate::core_modules::region::Region;
use crate::error::CutError;

/// Above this, `360 / (2 * cuts)` leaves no whole degree between rays.
pub const MAX_CUTS: u32 = 180;

/// Parameters of the cut search and overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutConfig {
    /// Number of diametric cuts (each cut yields two rays).
    pub cuts: u32,
    /// Consecutive background samples after which a ray is considered off the pizza.
    pub blank_tolerance: u32,
    /// Color used to paint cut lines on the overlay.
    pub marker: Pixel,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            cuts: 4,
            blank_tolerance: 3,
            marker: Pixel::BLACK,
        }
    }
}

impl CutConfig {
    pub fn validate(&self) -> Result<(), CutError> {
        validate_cuts(self.cuts)?;
        if self.blank_tolerance == 0 {
            return Err(CutError::InvalidConfiguration(
                "blank tolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// `cuts` must leave at least one whole degree between neighboring rays.
pub fn validate_cuts(cuts: u32) -> Result<(), CutError> {
    if cuts == 0 || cuts > MAX_CUTS {
        return Err(CutError::InvalidConfiguration(format!(
            "cuts must be within 1..={MAX_CUTS}, got {cuts}"
        )));
    }
    Ok(())
}

/// Where and how to cut: the result of one optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometrySolution {
    pub centroid: Point,
    pub radius: u32,
    /// Rotation of the cut pattern in whole degrees, within [0, 360 / (2 * cuts)).
    pub angle_offset: u32,
    pub cuts: u32,
    /// Topping samples crossed by all rays at `angle_offset`.
    pub hits: u64,
}

/// Floored mean position of all pizza pixels.
pub fn find_centroid<L>(width: u32, height: u32, label: &L) -> Result<Point, CutError>
where
    L: Fn(i64, i64) -> Region + ?Sized,
{
    let mut total_x = 0u64;
    let mut total_y = 0u64;
    let mut pizza_count = 0u64;

    for y in 0..height {
        for x in 0..width {
            if label(x as i64, y as i64).is_pizza() {
                total_x += x as u64;
                total_y += y as u64;
                pizza_count += 1;
            }
        }
    }

    if pizza_count == 0 {
        return Err(CutError::EmptyClassification);
    }

    Ok(Point::new(
        (total_x / pizza_count) as i64,
        (total_y / pizza_count) as i64,
    ))
}

/// Floored distance from `centroid` to the farthest of the four image corners.
pub fn cast_radius(width: u32, height: u32, centroid: Point) -> u32 {
    let (width, height) = (width as i64, height as i64);
    [(0, 0), (width, 0), (width, height), (0, height)]
        .into_iter()
        .map(|(corner_x, corner_y)| {
            let dx = (corner_x - centroid.x) as f64;
            let dy = (corner_y - centroid.y) as f64;
            (dx * dx + dy * dy).sqrt().floor() as u32
        })
        .max()
        .unwrap_or(0)
}

/// Picks the lowest score; on equal scores the first one seen is kept.
pub fn select_best<I>(scores: I) -> Option<(u32, u64)>
where
    I: IntoIterator<Item = (u32, u64)>,
{
    let mut best: Option<(u32, u64)> = None;
    for (offset, hits) in scores {
        match best {
            Some((_, best_hits)) if hits >= best_hits => {}
            _ => best = Some((offset, hits)),
        }
    }
    best
}

/// Counts topping samples along a ray, giving up after a run of background.
struct HitCounter<'a, L: ?Sized> {
    label: &'a L,
    blank_tolerance: u32,
    blanks_in_row: u32,
    hits: u64,
}

impl<L> RayVisitor for HitCounter<'_, L>
where
    L: Fn(i64, i64) -> Region + ?Sized,
{
    fn visit(&mut self, point: Point) -> RayStep {
        match (self.label)(point.x, point.y) {
            Region::NotPizza => self.blanks_in_row += 1,
            Region::Topping => {
                self.blanks_in_row = 0;
                self.hits += 1;
            }
            _ => self.blanks_in_row = 0,
        }

        if self.blanks_in_row >= self.blank_tolerance {
            RayStep::Stop
        } else {
            RayStep::Continue
        }
    }
}

/// Brute-force search for the cut rotation crossing the fewest toppings.
#[derive(Debug, Clone)]
pub struct CutAngleOptimizer {
    config: CutConfig,
}

impl CutAngleOptimizer {
    pub fn new(config: CutConfig) -> Result<Self, CutError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CutConfig {
        &self.config
    }

    /// Offsets worth testing: [0, 360 / (2 * cuts)).
    pub fn offsets(&self) -> Range<u32> {
        0..angle_steps(self.config.cuts)
    }

    /// Topping samples under every ray of the pattern rotated by `offset`.
    pub fn count_hits<L>(
        &self,
        width: u32,
        height: u32,
        label: &L,
        centroid: Point,
        radius: u32,
        offset: u32,
    ) -> u64
    where
        L: Fn(i64, i64) -> Region + ?Sized,
    {
        ray_angles(offset, self.config.cuts)
            .map(|angle| {
                let mut counter = HitCounter {
                    label,
                    blank_tolerance: self.config.blank_tolerance,
                    blanks_in_row: 0,
                    hits: 0,
                };
                Ray::new(centroid, angle, radius).walk(width, height, false, &mut counter);
                counter.hits
            })
            .sum()
    }

    /// Scores each offset in `offsets` and returns the best `(offset, hits)`.
    pub fn search<L>(
        &self,
        width: u32,
        height: u32,
        label: &L,
        centroid: Point,
        radius: u32,
        offsets: Range<u32>,
    ) -> Option<(u32, u64)>
    where
        L: Fn(i64, i64) -> Region + ?Sized,
    {
        select_best(offsets.map(|offset| {
            let hits = self.count_hits(width, height, label, centroid, radius, offset);
            debug!("offset {offset} crosses {hits} topping samples");
            (offset, hits)
        }))
    }

    /// Full run: center, radius, then the rotation search.
    pub fn optimize<L>(&self, width: u32, height: u32, label: &L) -> Result<GeometrySolution, CutError>
    where
        L: Fn(i64, i64) -> Region + ?Sized,
    {
        let centroid = find_centroid(width, height, label)?;
        let radius = cast_radius(width, height, centroid);
        debug!(
            "pizza center ({}, {}), cast radius {radius}",
            centroid.x, centroid.y
        );

        let (angle_offset, hits) = self
            .search(width, height, label, centroid, radius, self.offsets())
            .unwrap_or((0, 0));

        info!(
            "best rotation {angle_offset} deg for {} cuts, {hits} topping samples crossed",
            self.config.cuts
        );

        Ok(GeometrySolution {
            centroid,
            radius,
            angle_offset,
            cuts: self.config.cuts,
            hits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimizer(cuts: u32) -> CutAngleOptimizer {
        CutAngleOptimizer::new(CutConfig {
            cuts,
            ..CutConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn centroid_of_a_single_row() {
        let label = |x: i64, y: i64| {
            if y == 10 && (0..100).contains(&x) {
                Region::Crust
            } else {
                Region::NotPizza
            }
        };
        assert_eq!(find_centroid(100, 20, &label), Ok(Point::new(49, 10)));
    }

    #[test]
    fn other_counts_as_pizza_for_the_centroid() {
        let label = |x: i64, y: i64| {
            if x == 3 && y == 4 {
                Region::Other
            } else {
                Region::NotPizza
            }
        };
        assert_eq!(find_centroid(10, 10, &label), Ok(Point::new(3, 4)));
    }

    #[test]
    fn empty_image_is_reported() {
        let label = |_: i64, _: i64| Region::NotPizza;
        assert_eq!(
            optimizer(2).optimize(50, 50, &label),
            Err(CutError::EmptyClassification)
        );
    }

    #[test]
    fn radius_reaches_farthest_corner() {
        assert_eq!(cast_radius(100, 100, Point::new(50, 50)), 70);
        assert_eq!(cast_radius(100, 100, Point::new(0, 0)), 141);
        assert_eq!(cast_radius(30, 40, Point::new(30, 0)), 50);
        assert_eq!(cast_radius(0, 0, Point::new(0, 0)), 0);
    }

    #[test]
    fn rejects_invalid_cut_config() {
        assert!(CutAngleOptimizer::new(CutConfig {
            cuts: 0,
            ..CutConfig::default()
        })
        .is_err());
        assert!(CutAngleOptimizer::new(CutConfig {
            blank_tolerance: 0,
            ..CutConfig::default()
        })
        .is_err());
    }

    #[test]
    fn strict_comparison_keeps_first_best() {
        assert_eq!(select_best([(0, 5), (1, 3), (2, 3), (3, 4)]), Some((1, 3)));
        assert_eq!(select_best([(7, 0)]), Some((7, 0)));
        assert_eq!(select_best(Vec::new()), None);
    }

    #[test]
    fn offsets_cover_symmetry_range() {
        assert_eq!(optimizer(1).offsets(), 0..180);
        assert_eq!(optimizer(2).offsets(), 0..90);
        assert_eq!(optimizer(3).offsets(), 0..60);
    }

    #[test]
    fn band_through_the_center_is_crossed_diagonally() {
        // Topping band at y = 50 +- 5 across the full width, crust elsewhere.
        let label = |_: i64, y: i64| {
            if (45..=55).contains(&y) {
                Region::Topping
            } else {
                Region::Crust
            }
        };
        let optimizer = optimizer(2);
        let solution = optimizer.optimize(100, 100, &label).unwrap();
        assert_eq!(solution.centroid, Point::new(49, 49));

        assert_eq!(solution.radius, 72);

        // The diagonal cross is the only rotation with 22 hits; its neighbors score 25.
        assert_eq!((solution.angle_offset, solution.hits), (45, 22));
        let flat = optimizer.count_hits(100, 100, &label, solution.centroid, solution.radius, 0);
        assert_eq!(flat, 110);
        for offset in [44, 46] {
            let near = optimizer.count_hits(100, 100, &label, solution.centroid, solution.radius, offset);
            assert_eq!(near, 25, "offset {offset}");
        }
    }

    #[test]
    fn avoids_an_off_center_band_when_possible() {
        // Vertical topping band at x in [80, 85]; a single cut can dodge it by
        // leaving through the bottom edge before reaching it.
        let label = |x: i64, _: i64| {
            if (80..=85).contains(&x) {
                Region::Topping
            } else {
                Region::Crust
            }
        };
        let optimizer = optimizer(1);
        let solution = optimizer.optimize(100, 100, &label).unwrap();
        assert_eq!(solution.hits, 0);
        assert!((50..=70).contains(&solution.angle_offset));
        for offset in 0..solution.angle_offset {
            let hits = optimizer.count_hits(100, 100, &label, solution.centroid, solution.radius, offset);
            assert!(hits > 0, "offset {offset} should cross the band");
        }
    }

    #[test]
    fn rays_stop_after_leaving_the_pizza() {
        // Pizza disc of radius 20 at the center; a topping ring far outside it must
        // not be counted because every ray sees background first.
        let label = |x: i64, y: i64| {
            let (dx, dy) = ((x - 50) as f64, (y - 50) as f64);
            let distance = (dx * dx + dy * dy).sqrt();
            if distance <= 20.0 {
                Region::Crust
            } else if (35.0..=40.0).contains(&distance) {
                Region::Topping
            } else {
                Region::NotPizza
            }
        };
        let solution = optimizer(3).optimize(101, 101, &label).unwrap();
        assert_eq!(solution.hits, 0);
        assert_eq!(solution.angle_offset, 0);
    }
}
