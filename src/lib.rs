// THEORY:
// This file is the entry point for the `pizza_cutter` library crate. It exposes
// the `CutPipeline` (and its async sibling `ParallelPipeline`) as the high-level
// interface: hand it a decoded image, get back the classified regions, the cut
// geometry and an annotated copy of the image.
//
// The building blocks stay reachable under `core_modules` for callers that want
// to drive a single stage: classify one pixel, build a region grid, search cut
// angles over their own label accessor, or draw cuts onto their own sink.

#![forbid(unsafe_code)]

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::cut_optimizer::{CutAngleOptimizer, CutConfig, GeometrySolution};
pub use core_modules::pixel::pixel::Pixel;
pub use core_modules::region::{ClassificationMode, ClassifierConfig, Region, RegionClassifier};
pub use core_modules::region_map::RegionGrid;
pub use error::CutError;
pub use parallel_pipeline::ParallelPipeline;
pub use pipeline::{
    CutPipeline, CutReport, PipelineConfig, build_region_grid, optimize_cut_angle,
    render_cut_overlay,
};
