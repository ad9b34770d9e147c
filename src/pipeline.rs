// THEORY:
// The `pipeline` module is the top-level API of the cutter. It strings the layers
// together for one image:
//
//   source image -> RegionMap (quantize + classify) -> RegionGrid
//                -> CutAngleOptimizer -> GeometrySolution
//                -> CutOverlayRenderer -> annotated copy of the source
//
// Nothing is cached between runs; every call recomputes from the image it is given.

use image::RgbImage;
use log::debug;

use crate::core_modules::cut_optimizer::{CutAngleOptimizer, CutConfig, GeometrySolution};
use crate::core_modules::overlay::CutOverlayRenderer;
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::quantizer::Quantizer;
use crate::core_modules::region::{ClassifierConfig, Region, RegionClassifier};
use crate::core_modules::region_map::{OutputLabels, RegionGrid, RegionMap};
use crate::error::CutError;

// Re-export key data structures for the public API.
pub use crate::core_modules::overlay::{OverlaySink, render_cut_overlay};
pub use crate::core_modules::ray::Point;

/// Configuration for the cut pipelines, allowing for tunable behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Levels kept per channel before classification (1..=255).
    pub color_levels: u32,
    pub classifier: ClassifierConfig,
    pub cut: CutConfig,
    /// Number of concurrent tasks used by `ParallelPipeline`.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            color_levels: 8,
            classifier: ClassifierConfig::default(),
            cut: CutConfig::default(),
            workers: num_cpus::get(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), CutError> {
        Quantizer::from_color_levels(self.color_levels)?;
        self.classifier.validate()?;
        self.cut.validate()?;
        if self.workers == 0 {
            return Err(CutError::InvalidConfiguration(
                "at least one worker is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct CutReport {
    pub grid: RegionGrid,
    pub solution: GeometrySolution,
    /// The source image with the cut lines painted on.
    pub overlay: RgbImage,
}

/// Synchronous, single-threaded cut pipeline.
#[derive(Debug, Clone)]
pub struct CutPipeline {
    config: PipelineConfig,
    region_map: RegionMap,
    optimizer: CutAngleOptimizer,
    renderer: CutOverlayRenderer,
}

impl CutPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, CutError> {
        config.validate()?;
        let region_map = RegionMap::new(
            Quantizer::from_color_levels(config.color_levels)?,
            RegionClassifier::new(config.classifier.clone())?,
        );
        let optimizer = CutAngleOptimizer::new(config.cut)?;
        let renderer = CutOverlayRenderer::new(config.cut.marker);
        Ok(Self {
            config,
            region_map,
            optimizer,
            renderer,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn region_map(&self) -> &RegionMap {
        &self.region_map
    }

    pub fn optimizer(&self) -> &CutAngleOptimizer {
        &self.optimizer
    }

    pub fn classify(&self, image: &RgbImage) -> RegionGrid {
        let grid = self.region_map.build_grid_from_image(image);
        debug!(
            "classified {}x{}: {} topping, {} crust, {} cheese, {} background",
            grid.width(),
            grid.height(),
            grid.count(Region::Topping),
            grid.count(Region::Crust),
            grid.count(Region::Cheese),
            grid.count(Region::NotPizza),
        );
        grid
    }

    /// The classified grid rendered with the region palette.
    pub fn paint_regions(&self, grid: &RegionGrid) -> RgbImage {
        grid.paint(self.region_map.classifier())
    }

    pub fn optimize(&self, grid: &RegionGrid) -> Result<GeometrySolution, CutError> {
        self.optimizer
            .optimize(grid.width(), grid.height(), &|x, y| grid.label(x, y))
    }

    /// Runs the search over an image already painted with the region palette.
    pub fn optimize_painted(&self, painted: &RgbImage) -> Result<GeometrySolution, CutError> {
        let labels = OutputLabels::new(painted, self.region_map.classifier());
        self.optimizer
            .optimize(painted.width(), painted.height(), &|x, y| labels.label(x, y))
    }

    /// A copy of `image` with the cut lines of `solution` drawn on it.
    pub fn render(&self, image: &RgbImage, solution: &GeometrySolution) -> Result<RgbImage, CutError> {
        let mut overlay = image.clone();
        self.renderer
            .render(image.width(), image.height(), solution, &mut overlay)?;
        Ok(overlay)
    }

    pub fn run(&self, image: &RgbImage) -> Result<CutReport, CutError> {
        let grid = self.classify(image);
        let solution = self.optimize(&grid)?;
        let overlay = self.render(image, &solution)?;
        Ok(CutReport {
            grid,
            solution,
            overlay,
        })
    }
}

/// Classifies every pixel of a `width` x `height` source.
pub fn build_region_grid<F>(
    width: u32,
    height: u32,
    pixel_source: F,
    color_levels: u32,
) -> Result<RegionGrid, CutError>
where
    F: Fn(u32, u32) -> Pixel,
{
    let region_map = RegionMap::new(
        Quantizer::from_color_levels(color_levels)?,
        RegionClassifier::new(ClassifierConfig::default())?,
    );
    Ok(region_map.build_grid(width, height, pixel_source))
}

/// Finds the rotation of `cuts` evenly spaced cuts crossing the fewest toppings.
pub fn optimize_cut_angle<L>(
    width: u32,
    height: u32,
    label: &L,
    cuts: u32,
) -> Result<GeometrySolution, CutError>
where
    L: Fn(i64, i64) -> Region + ?Sized,
{
    CutAngleOptimizer::new(CutConfig {
        cuts,
        ..CutConfig::default()
    })?
    .optimize(width, height, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRUST: image::Rgb<u8> = image::Rgb([170, 170, 170]);
    const PEPPERONI: image::Rgb<u8> = image::Rgb([170, 0, 0]);

    fn crust_with_square() -> RgbImage {
        RgbImage::from_fn(100, 100, |x, y| {
            if (45..55).contains(&x) && (45..55).contains(&y) {
                PEPPERONI
            } else {
                CRUST
            }
        })
    }

    fn pipeline(cuts: u32) -> CutPipeline {
        CutPipeline::new(PipelineConfig {
            cut: CutConfig {
                cuts,
                ..CutConfig::default()
            },
            workers: 1,
            ..PipelineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn end_to_end_square_on_crust() {
        let report = pipeline(1).run(&crust_with_square()).unwrap();
        let centroid = report.solution.centroid;
        assert!((centroid.x - 50).abs() <= 2 && (centroid.y - 50).abs() <= 2);
        // floor(sqrt(51^2 + 51^2)) from (49, 49) to the far corner.
        assert!((69..=73).contains(&report.solution.radius));
        assert!(report.solution.angle_offset < 180);
        assert_eq!(report.grid.count(Region::Topping), 100);
        assert_eq!(report.overlay.dimensions(), (100, 100));
    }

    #[test]
    fn overlay_marks_the_source_copy() {
        let image = crust_with_square();
        let report = pipeline(2).run(&image).unwrap();
        let marked = report
            .overlay
            .pixels()
            .filter(|p| p.0 == [0, 0, 0])
            .count();
        assert!(marked > 0);
        // The source is untouched and every unmarked pixel is copied verbatim.
        for (x, y, pixel) in report.overlay.enumerate_pixels() {
            if pixel.0 != [0, 0, 0] {
                assert_eq!(pixel, image.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn painted_route_agrees_with_grid_route() {
        let pipeline = pipeline(3);
        let image = crust_with_square();
        let grid = pipeline.classify(&image);
        let direct = pipeline.optimize(&grid).unwrap();
        let painted = pipeline.optimize_painted(&pipeline.paint_regions(&grid)).unwrap();
        assert_eq!(direct, painted);
    }

    #[test]
    fn blank_image_is_an_empty_classification() {
        let white = RgbImage::from_pixel(40, 40, image::Rgb([255, 255, 255]));
        assert_eq!(
            pipeline(2).run(&white).map(|r| r.solution),
            Err(CutError::EmptyClassification)
        );
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let bad_levels = PipelineConfig {
            color_levels: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            CutPipeline::new(bad_levels),
            Err(CutError::InvalidConfiguration(_))
        ));
        let no_workers = PipelineConfig {
            workers: 0,
            ..PipelineConfig::default()
        };
        assert!(CutPipeline::new(no_workers).is_err());
        assert!(optimize_cut_angle(10, 10, &|_: i64, _: i64| Region::Crust, 0).is_err());
        assert!(build_region_grid(1, 1, |_, _| Pixel::BLACK, 256).is_err());
    }

    #[test]
    fn free_functions_match_the_pipeline() {
        let image = crust_with_square();
        let grid = build_region_grid(100, 100, |x, y| Pixel::from(*image.get_pixel(x, y)), 8).unwrap();
        let solution = optimize_cut_angle(100, 100, &|x, y| grid.label(x, y), 1).unwrap();
        let report = pipeline(1).run(&image).unwrap();
        assert_eq!(grid, report.grid);
        assert_eq!(solution, report.solution);
    }
}
