// THEORY:
// A ray is the discrete trace of one half of a diametric cut: a run of pixel
// positions marching out from the pizza center at a fixed angle. Both the cut
// search (which counts toppings under the ray) and the overlay (which paints the
// ray) walk exactly the same positions, so the walk lives here once and the two
// callers plug in a `RayVisitor`.
//
// Walk rules, in order, for each step s in 0..length:
// 1.  Step 0 is the center itself. Only visited when the caller asks for it.
// 2.  Step s > 0 samples (floor(cx + cos(t)*s), floor(cy + sin(t)*s)).
// 3.  A sample equal to the previous fresh sample is skipped. The "previous" sample
//     starts out as the image origin (0, 0), not the center.
// 4.  A sample with x > width or y > height (or negative) ends the walk. The edge
//     column x == width and row y == height still count as inside; this matches the
//     reach of previously published cut angles and is kept on purpose.
// 5.  The visitor sees every remaining sample and may stop the walk.

use std::f64::consts::PI;

/// Integer pixel position. Signed so rays can step past the top/left edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// What the walk should do after a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayStep {
    Continue,
    Stop,
}

/// Receives each fresh, in-bounds sample of a ray.
pub trait RayVisitor {
    fn visit(&mut self, point: Point) -> RayStep;
}

impl<F> RayVisitor for F
where
    F: FnMut(Point) -> RayStep,
{
    fn visit(&mut self, point: Point) -> RayStep {
        self(point)
    }
}

/// Number of distinct rotation offsets for `cuts` evenly spaced diametric cuts.
/// Also the spacing, in degrees, between neighboring rays.
/// Zero when `cuts` is zero or too large to fit a whole degree between rays.
pub fn angle_steps(cuts: u32) -> u32 {
    360u32.checked_div(cuts.saturating_mul(2)).unwrap_or(0)
}

/// Angles (degrees) of the `2 * cuts` rays making up the cut pattern at `offset`.
pub fn ray_angles(offset: u32, cuts: u32) -> impl Iterator<Item = u32> {
    let spacing = angle_steps(cuts);
    let rays = if spacing == 0 { 0 } else { 2 * cuts };
    (0..rays).map(move |index| offset.saturating_add(spacing * index))
}

/// One ray from `center` at `angle_degrees`, `length` samples long.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub center: Point,
    pub angle_degrees: u32,
    pub length: u32,
}

impl Ray {
    pub fn new(center: Point, angle_degrees: u32, length: u32) -> Self {
        Self {
            center,
            angle_degrees,
            length,
        }
    }

    fn sample(&self, step: u32, cos: f64, sin: f64) -> Point {
        Point::new(
            (self.center.x as f64 + cos * step as f64).floor() as i64,
            (self.center.y as f64 + sin * step as f64).floor() as i64,
        )
    }

    /// Walks the ray inside `[0, width] x [0, height]`, feeding fresh samples to `visitor`.
    pub fn walk<V>(&self, width: u32, height: u32, include_center: bool, visitor: &mut V)
    where
        V: RayVisitor + ?Sized,
    {
        let theta = self.angle_degrees as f64 * PI / 180.0;
        let (sin, cos) = theta.sin_cos();
        let (width, height) = (width as i64, height as i64);
        let mut last = Point::default();

        for step in 0..self.length {
            let current = if step == 0 {
                if !include_center {
                    continue;
                }
                self.center
            } else {
                self.sample(step, cos, sin)
            };

            if current == last {
                continue;
            }
            last = current;

            if current.x > width || current.y > height || current.x < 0 || current.y < 0 {
                break;
            }

            if visitor.visit(current) == RayStep::Stop {
                break;
            }
        }
    }

    /// Collects the samples a full walk would visit. Mostly useful for inspection.
    pub fn samples(&self, width: u32, height: u32, include_center: bool) -> Vec<Point> {
        let mut points = Vec::new();
        self.walk(width, height, include_center, &mut |point: Point| {
            points.push(point);
            RayStep::Continue
        });
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_steps_exploit_cut_symmetry() {
        assert_eq!(angle_steps(1), 180);
        assert_eq!(angle_steps(2), 90);
        assert_eq!(angle_steps(4), 45);
        assert_eq!(angle_steps(7), 25);
        assert_eq!(angle_steps(180), 1);
    }

    #[test]
    fn degenerate_cut_counts_have_no_rays() {
        assert_eq!(angle_steps(0), 0);
        assert_eq!(angle_steps(181), 0);
        assert_eq!(angle_steps(1 << 31), 0);
        assert_eq!(angle_steps(u32::MAX), 0);
        assert_eq!(ray_angles(0, 0).count(), 0);
        assert_eq!(ray_angles(0, 1 << 31).count(), 0);
    }

    #[test]
    fn ray_angles_fan_out_from_offset() {
        assert_eq!(ray_angles(10, 2).collect::<Vec<_>>(), vec![10, 100, 190, 280]);
        assert_eq!(ray_angles(0, 1).collect::<Vec<_>>(), vec![0, 180]);
    }

    #[test]
    fn horizontal_ray_steps_one_pixel_at_a_time() {
        let ray = Ray::new(Point::new(5, 5), 0, 4);
        assert_eq!(
            ray.samples(20, 20, false),
            vec![Point::new(6, 5), Point::new(7, 5), Point::new(8, 5)]
        );
        assert_eq!(ray.samples(20, 20, true)[0], Point::new(5, 5));
    }

    #[test]
    fn repeated_samples_are_skipped() {
        // At 45 degrees the first sample floors back onto the center.
        let ray = Ray::new(Point::new(10, 10), 45, 6);
        let samples = ray.samples(40, 40, true);
        for pair in samples.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(samples[0], Point::new(10, 10));
        assert!(!samples[1..].contains(&Point::new(10, 10)));

        // Without the center, the first fresh sample is compared with the origin
        // and so the center position is still visited once.
        let without_center = ray.samples(40, 40, false);
        assert_eq!(without_center[0], Point::new(10, 10));
    }

    #[test]
    fn edge_column_is_inside_but_beyond_is_not() {
        let ray = Ray::new(Point::new(7, 3), 0, 50);
        let samples = ray.samples(10, 10, false);
        assert_eq!(samples.last(), Some(&Point::new(10, 3)));
        assert!(samples.iter().all(|p| p.x <= 10 && p.y <= 10));
    }

    #[test]
    fn leftward_ray_stops_before_negative_coordinates() {
        let ray = Ray::new(Point::new(2, 2), 180, 50);
        let samples = ray.samples(10, 10, false);
        assert_eq!(samples.last().map(|p| p.x), Some(0));
        assert!(samples.iter().all(|p| p.x >= 0));
    }

    #[test]
    fn visitor_can_stop_the_walk() {
        let ray = Ray::new(Point::new(0, 5), 0, 100);
        let mut visited = 0;
        ray.walk(100, 100, false, &mut |_: Point| {
            visited += 1;
            if visited == 3 {
                RayStep::Stop
            } else {
                RayStep::Continue
            }
        });
        assert_eq!(visited, 3);
    }
}
