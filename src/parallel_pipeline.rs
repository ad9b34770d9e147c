// THEORY:
// `ParallelPipeline` produces exactly the same `CutReport` as `CutPipeline`, but
// spreads the two expensive stages over a pool of blocking tasks:
//
// 1.  **Classification** is split into horizontal bands of rows. Every cell only
//     depends on its own pixel, so bands are classified independently and their
//     cells concatenated in band order.
// 2.  **Cut search** is split into contiguous ranges of rotation offsets. Each task
//     reports the best `(offset, hits)` of its range; the caller reduces those in
//     ascending range order with the same strict comparison, so the earliest
//     offset still wins ties.
//
// The center and radius are cheap single passes and stay on the calling task.
// Workers never share mutable state; results only meet in the final reduction.

use std::ops::Range;
use std::sync::Arc;

use futures::future::join_all;
use image::RgbImage;
use log::{debug, info};
use tokio::task::{JoinError, spawn_blocking};

use crate::core_modules::cut_optimizer::{GeometrySolution, cast_radius, find_centroid, select_best};
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::region_map::RegionGrid;
use crate::error::CutError;
use crate::pipeline::{CutPipeline, CutReport, PipelineConfig};

/// Splits `range` into at most `parts` contiguous, ordered, non-empty pieces.
pub fn split_range(range: Range<u32>, parts: usize) -> Vec<Range<u32>> {
    let total = range.end.saturating_sub(range.start);
    if total == 0 || parts == 0 {
        return Vec::new();
    }
    let parts = (parts as u32).min(total);
    let base = total / parts;
    let remainder = total % parts;

    let mut pieces = Vec::with_capacity(parts as usize);
    let mut start = range.start;
    for index in 0..parts {
        let length = base + u32::from(index < remainder);
        pieces.push(start..start + length);
        start += length;
    }
    pieces
}

fn worker_error(error: JoinError) -> CutError {
    CutError::Worker(error.to_string())
}

pub struct ParallelPipeline {
    pipeline: Arc<CutPipeline>,
    workers: usize,
}

impl ParallelPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, CutError> {
        let workers = config.workers;
        let pipeline = CutPipeline::new(config)?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
            workers,
        })
    }

    pub fn pipeline(&self) -> &CutPipeline {
        &self.pipeline
    }

    pub async fn classify(&self, image: Arc<RgbImage>) -> Result<RegionGrid, CutError> {
        let (width, height) = image.dimensions();
        let bands = split_range(0..height, self.workers);
        debug!("classifying {width}x{height} in {} bands", bands.len());

        let tasks = bands.into_iter().map(|rows| {
            let pipeline = Arc::clone(&self.pipeline);
            let image = Arc::clone(&image);
            spawn_blocking(move || {
                pipeline
                    .region_map()
                    .classify_rows(width, rows, |x, y| Pixel::from(*image.get_pixel(x, y)))
            })
        });

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for band in join_all(tasks).await {
            cells.extend(band.map_err(worker_error)?);
        }
        RegionGrid::from_cells(width, height, cells)
    }

    pub async fn optimize(&self, grid: Arc<RegionGrid>) -> Result<GeometrySolution, CutError> {
        let (width, height) = (grid.width(), grid.height());
        let centroid = find_centroid(width, height, &|x, y| grid.label(x, y))?;
        let radius = cast_radius(width, height, centroid);
        let offsets = self.pipeline.optimizer().offsets();

        let tasks = split_range(offsets, self.workers).into_iter().map(|range| {
            let pipeline = Arc::clone(&self.pipeline);
            let grid = Arc::clone(&grid);
            spawn_blocking(move || {
                pipeline.optimizer().search(
                    width,
                    height,
                    &|x, y| grid.label(x, y),
                    centroid,
                    radius,
                    range,
                )
            })
        });

        let mut range_bests = Vec::new();
        for best in join_all(tasks).await {
            range_bests.extend(best.map_err(worker_error)?);
        }
        let (angle_offset, hits) = select_best(range_bests).unwrap_or((0, 0));

        Ok(GeometrySolution {
            centroid,
            radius,
            angle_offset,
            cuts: self.pipeline.optimizer().config().cuts,
            hits,
        })
    }

    pub async fn run(&self, image: Arc<RgbImage>) -> Result<CutReport, CutError> {
        let grid = Arc::new(self.classify(Arc::clone(&image)).await?);
        let solution = self.optimize(Arc::clone(&grid)).await?;
        info!(
            "best rotation {} deg for {} cuts, {} topping samples crossed",
            solution.angle_offset,
            solution.cuts,
            solution.hits
        );
        let overlay = self.pipeline.render(&image, &solution)?;
        let grid = Arc::try_unwrap(grid).unwrap_or_else(|shared| (*shared).clone());
        Ok(CutReport {
            grid,
            solution,
            overlay,
        })
    }
}
