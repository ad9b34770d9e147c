// THEORY:
// The `RegionMap` is the bridge between raw image data and the cut search. It
// owns a quantizer and a classifier and turns every source pixel into a `Region`,
// storing the labels in a flat, row-major `RegionGrid` with the same dimensions as
// the image.
//
// Key architectural principles:
// 1.  **Per-pixel purity**: each cell depends only on its own source pixel, so the
//     grid can be filled in any order. `classify_rows` exposes a horizontal band of
//     rows as the unit of work for the parallel pipeline.
// 2.  **Full recomputation**: a grid is rebuilt from scratch on every run; nothing
//     carries over between images.
// 3.  **Tolerant reads**: `RegionGrid::label` accepts any signed coordinate. Reads
//     outside the grid report `Region::Other`, which the optimizer treats as neither
//     topping nor background. Rays are allowed to touch the column x == width and
//     the row y == height, so those reads happen in practice.

use std::ops::Range;

use image::RgbImage;

use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::quantizer::Quantizer;
use crate::core_modules::region::{Region, RegionClassifier};
use crate::error::CutError;

/// Row-major grid of region labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGrid {
    width: u32,
    height: u32,
    cells: Vec<Region>,
}

impl RegionGrid {
    /// Assembles a grid from row-major cells.
    pub fn from_cells(width: u32, height: u32, cells: Vec<Region>) -> Result<Self, CutError> {
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(CutError::InvalidConfiguration(format!(
                "grid of {width}x{height} needs {expected} cells, got {}",
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Region> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Label accessor for the optimizer. Off-grid coordinates read as `Region::Other`.
    pub fn label(&self, x: i64, y: i64) -> Region {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(x), Ok(y)) => self.get(x, y).unwrap_or(Region::Other),
            _ => Region::Other,
        }
    }

    pub fn count(&self, region: Region) -> usize {
        self.cells.iter().filter(|cell| **cell == region).count()
    }

    /// Renders each label with its palette color.
    pub fn paint(&self, classifier: &RegionClassifier) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let region = self.get(x, y).unwrap_or(Region::Other);
            classifier.paint_color(region).into()
        })
    }
}

/// Reads labels back out of an image painted by `RegionGrid::paint`.
pub struct OutputLabels<'a> {
    image: &'a RgbImage,
    classifier: &'a RegionClassifier,
}

impl<'a> OutputLabels<'a> {
    pub fn new(image: &'a RgbImage, classifier: &'a RegionClassifier) -> Self {
        Self { image, classifier }
    }

    pub fn label(&self, x: i64, y: i64) -> Region {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return Region::Other;
        }
        let pixel = Pixel::from(*self.image.get_pixel(x as u32, y as u32));
        self.classifier.classify_output_pixel(pixel)
    }
}

/// Quantizes and classifies whole images into `RegionGrid`s.
#[derive(Debug, Clone)]
pub struct RegionMap {
    quantizer: Quantizer,
    classifier: RegionClassifier,
}

impl RegionMap {
    pub fn new(quantizer: Quantizer, classifier: RegionClassifier) -> Self {
        Self {
            quantizer,
            classifier,
        }
    }

    pub fn classifier(&self) -> &RegionClassifier {
        &self.classifier
    }

    pub fn classify(&self, pixel: Pixel) -> Region {
        self.classifier
            .classify_source_pixel(self.quantizer.quantize(pixel))
    }

    /// Classifies rows `rows` of a `width`-wide source, row-major.
    pub fn classify_rows<F>(&self, width: u32, rows: Range<u32>, pixel_source: F) -> Vec<Region>
    where
        F: Fn(u32, u32) -> Pixel,
    {
        let row_count = rows.end.saturating_sub(rows.start) as usize;
        let mut cells = Vec::with_capacity(width as usize * row_count);
        for y in rows {
            for x in 0..width {
                cells.push(self.classify(pixel_source(x, y)));
            }
        }
        cells
    }

    pub fn build_grid<F>(&self, width: u32, height: u32, pixel_source: F) -> RegionGrid
    where
        F: Fn(u32, u32) -> Pixel,
    {
        RegionGrid {
            width,
            height,
            cells: self.classify_rows(width, 0..height, pixel_source),
        }
    }

    pub fn build_grid_from_image(&self, image: &RgbImage) -> RegionGrid {
        self.build_grid(image.width(), image.height(), |x, y| {
            Pixel::from(*image.get_pixel(x, y))
        })
    }
}
