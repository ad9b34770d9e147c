// THEORY:
// The region classifier turns one color into one semantic label. It is a
// nearest-neighbor decision against three reference colors (topping, crust,
// cheese) with a rejection radius: anything too far from every reference, and the
// pure black and pure white canvas colors, is `NotPizza`.
//
// Three classification modes coexist:
// 1.  **RGB source mode**: Euclidean distance in RGB space on the quantized pixel.
//     This is the default and what the pipelines use.
// 2.  **HSV source mode**: polar distance over (hue, saturation). Less sensitive to
//     brightness, useful for shadowed photos.
// 3.  **Output mode**: exact match against the paint palette used to render a
//     classified grid back into an image. It lets the optimizer read labels from a
//     painted image exactly as it would from the grid itself.
//
// Ties between references resolve in the fixed order topping, crust, cheese.

use crate::core_modules::color_metric::color_metric::SmartPixel;
use crate::core_modules::pixel::pixel::{HsvColor, Pixel};
use crate::error::CutError;

/// Semantic label of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    NotPizza,
    Crust,
    Cheese,
    Topping,
    Other,
}

impl Region {
    pub fn is_pizza(self) -> bool {
        self != Region::NotPizza
    }
}

/// Which distance the source classifier uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationMode {
    #[default]
    Rgb,
    Hsv,
}

/// Colors used to paint each region when a grid is rendered back to an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionPalette {
    pub topping: Pixel,
    pub crust: Pixel,
    pub cheese: Pixel,
    pub other: Pixel,
    pub not_pizza: Pixel,
}

impl Default for RegionPalette {
    fn default() -> Self {
        Self {
            topping: Pixel::new(255, 0, 0),
            crust: Pixel::new(0, 255, 0),
            cheese: Pixel::new(0, 0, 255),
            other: Pixel::BLACK,
            not_pizza: Pixel::WHITE,
        }
    }
}

/// Reference colors and rejection thresholds for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub mode: ClassificationMode,

    // -- RGB mode --
    pub topping_rgb: Pixel,
    pub crust_rgb: Pixel,
    pub cheese_rgb: Pixel,
    /// A pixel farther than this from every RGB reference is not pizza.
    pub rgb_threshold: f64,

    // -- HSV mode --
    pub topping_hsv: HsvColor,
    pub crust_hsv: HsvColor,
    pub cheese_hsv: HsvColor,
    /// A pixel farther than this from every HSV reference is not pizza.
    pub hsv_threshold: f64,

    /// Colors that are never pizza regardless of distance (the canvas colors).
    pub background_colors: Vec<Pixel>,
    /// Paint colors for the output mode.
    pub palette: RegionPalette,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mode: ClassificationMode::Rgb,
            topping_rgb: Pixel::new(170, 0, 0),
            crust_rgb: Pixel::new(170, 170, 170),
            cheese_rgb: Pixel::new(170, 170, 85),
            rgb_threshold: 120.0,
            topping_hsv: HsvColor::new(7.0, 83.0, 73.0),
            crust_hsv: HsvColor::new(33.0, 58.0, 96.0),
            cheese_hsv: HsvColor::new(44.0, 30.0, 92.0),
            hsv_threshold: 240.0,
            background_colors: vec![Pixel::BLACK, Pixel::WHITE],
            palette: RegionPalette::default(),
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), CutError> {
        for (name, threshold) in [("rgb", self.rgb_threshold), ("hsv", self.hsv_threshold)] {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(CutError::InvalidConfiguration(format!(
                    "{name} threshold must be a non-negative number, got {threshold}"
                )));
            }
        }
        Ok(())
    }
}

/// Maps a single color to a `Region`.
#[derive(Debug, Clone)]
pub struct RegionClassifier {
    config: ClassifierConfig,
}

impl RegionClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, CutError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies an (already quantized) source pixel with the configured mode.
    pub fn classify_source_pixel(&self, pixel: Pixel) -> Region {
        match self.config.mode {
            ClassificationMode::Rgb => self.classify_rgb_pixel(pixel),
            ClassificationMode::Hsv => self.classify_hsv_pixel(pixel),
        }
    }

    pub fn classify_rgb_pixel(&self, pixel: Pixel) -> Region {
        let smart = SmartPixel::new(pixel);
        self.nearest(
            pixel,
            smart.rgb_distance(&self.config.topping_rgb),
            smart.rgb_distance(&self.config.crust_rgb),
            smart.rgb_distance(&self.config.cheese_rgb),
            self.config.rgb_threshold,
        )
    }

    pub fn classify_hsv_pixel(&self, pixel: Pixel) -> Region {
        let smart = SmartPixel::new(pixel);
        self.nearest(
            pixel,
            smart.polar_distance(&self.config.topping_hsv),
            smart.polar_distance(&self.config.crust_hsv),
            smart.polar_distance(&self.config.cheese_hsv),
            self.config.hsv_threshold,
        )
    }

    fn nearest(
        &self,
        pixel: Pixel,
        topping: f64,
        crust: f64,
        cheese: f64,
        threshold: f64,
    ) -> Region {
        let low = topping.min(crust.min(cheese));
        if low > threshold || self.config.background_colors.contains(&pixel) {
            return Region::NotPizza;
        }
        if low == topping {
            Region::Topping
        } else if low == crust {
            Region::Crust
        } else if low == cheese {
            Region::Cheese
        } else {
            Region::Other
        }
    }

    /// Reads back a label from a pixel painted with the palette. Exact match only.
    pub fn classify_output_pixel(&self, pixel: Pixel) -> Region {
        let palette = &self.config.palette;
        if pixel == palette.topping {
            Region::Topping
        } else if pixel == palette.crust {
            Region::Crust
        } else if pixel == palette.cheese {
            Region::Cheese
        } else if pixel == palette.not_pizza {
            Region::NotPizza
        } else {
            Region::Other
        }
    }

    pub fn paint_color(&self, region: Region) -> Pixel {
        let palette = &self.config.palette;
        match region {
            Region::Topping => palette.topping,
            Region::Crust => palette.crust,
            Region::Cheese => palette.cheese,
            Region::Other => palette.other,
            Region::NotPizza => palette.not_pizza,
        }
    }
}
