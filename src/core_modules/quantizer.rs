// THEORY:
// Photographs of food are noisy: JPEG blocks, uneven lighting, grease highlights.
// Before a pixel is compared with the reference colors its channels are bucketed
// (v -> floor(v / factor) * factor) so that near-identical shades collapse onto
// the same value. The factor is derived from the number of color levels the caller
// wants to keep: factor = floor(255 / levels).

use crate::core_modules::pixel::pixel::{Channel, Pixel};
use crate::error::CutError;

/// Per-channel bucket quantizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    factor: u8,
}

impl Quantizer {
    /// Builds a quantizer keeping roughly `color_levels` levels per channel.
    ///
    /// `color_levels` must be in 1..=255, otherwise the bucket width would be zero.
    pub fn from_color_levels(color_levels: u32) -> Result<Self, CutError> {
        if color_levels == 0 || color_levels > 255 {
            return Err(CutError::InvalidConfiguration(format!(
                "color levels must be within 1..=255, got {color_levels}"
            )));
        }
        Ok(Self {
            factor: (255 / color_levels) as u8,
        })
    }

    pub fn factor(&self) -> u8 {
        self.factor
    }

    fn bucket(&self, value: Channel) -> Channel {
        (value / self.factor) * self.factor
    }

    pub fn quantize(&self, pixel: Pixel) -> Pixel {
        Pixel::new(
            self.bucket(pixel.red),
            self.bucket(pixel.green),
            self.bucket(pixel.blue),
        )
    }
}
