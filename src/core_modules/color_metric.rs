// THEORY:
// The `color_metric` module answers one question: how far apart are two colors?
// It offers two "lenses", each useful for a different classifier:
// - `rgb_distance`: plain Euclidean distance over the red, green and blue channels.
//   Cheap and well behaved once the source image has been quantized.
// - `polar_distance`: hue is treated as an angle and saturation as a radius, and
//   the distance is the chord between the two polar points (law of cosines). Hue
//   wraparound is handled by the cosine, so 359 and 1 degrees are neighbors.
//
// `SmartPixel` wraps a `Pixel` and caches its hue and saturation so one pixel can
// be compared against several reference colors without recomputing them.

pub mod color_metric {
    use crate::core_modules::pixel::pixel::{HsvColor, Hue, Pixel, Saturation};

    pub type ColorDistance = f64;

    /// Euclidean distance in RGB space.
    pub fn rgb_distance(a: &Pixel, b: &Pixel) -> ColorDistance {
        let squared = |x: u8, y: u8| {
            let delta = x as f64 - y as f64;
            delta * delta
        };
        (squared(a.red, b.red) + squared(a.green, b.green) + squared(a.blue, b.blue)).sqrt()
    }

    /// Chord distance between two (hue, saturation) points, hue in degrees.
    pub fn polar_distance(
        hue_a: Hue,
        saturation_a: Saturation,
        hue_b: Hue,
        saturation_b: Saturation,
    ) -> ColorDistance {
        let angle = hue_b.to_radians() - hue_a.to_radians();
        let squared = saturation_a * saturation_a + saturation_b * saturation_b
            - 2.0 * saturation_a * saturation_b * angle.cos();
        // Rounding can push an exact match a hair below zero.
        squared.max(0.0).sqrt()
    }

    /// An analytical wrapper around a `Pixel` with its HSV form cached.
    #[derive(Debug, Clone, Copy)]
    pub struct SmartPixel {
        /// The raw `Pixel` data this `SmartPixel` is analyzing.
        pub pixel: Pixel,
        /// Hue and saturation, pre-calculated for one-to-many comparisons.
        hsv: HsvColor,
    }

    impl SmartPixel {
        pub fn new(pixel: Pixel) -> Self {
            Self {
                hsv: pixel.to_hsv(),
                pixel,
            }
        }

        pub fn hsv(&self) -> HsvColor {
            self.hsv
        }

        pub fn rgb_distance(&self, reference: &Pixel) -> ColorDistance {
            rgb_distance(&self.pixel, reference)
        }

        pub fn polar_distance(&self, reference: &HsvColor) -> ColorDistance {
            polar_distance(
                self.hsv.hue,
                self.hsv.saturation,
                reference.hue,
                reference.saturation,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::color_metric::*;
    use crate::core_modules::pixel::pixel::{HsvColor, Pixel};

    #[test]
    fn rgb_distance_is_zero_on_identity_and_symmetric() {
        let samples = [
            Pixel::new(0, 0, 0),
            Pixel::new(170, 0, 0),
            Pixel::new(170, 170, 85),
            Pixel::new(12, 250, 33),
        ];
        for a in &samples {
            assert_eq!(rgb_distance(a, a), 0.0);
            for b in &samples {
                assert_eq!(rgb_distance(a, b), rgb_distance(b, a));
            }
        }
    }

    #[test]
    fn rgb_distance_sums_all_channels() {
        let a = Pixel::new(0, 0, 0);
        assert_eq!(rgb_distance(&a, &Pixel::new(3, 4, 0)), 5.0);
        assert_eq!(rgb_distance(&a, &Pixel::new(0, 3, 4)), 5.0);
        assert_eq!(rgb_distance(&a, &Pixel::new(4, 0, 3)), 5.0);
    }

    #[test]
    fn polar_distance_respects_hue_wraparound() {
        let near = polar_distance(359.0, 100.0, 1.0, 100.0);
        let far = polar_distance(179.0, 100.0, 1.0, 100.0);
        assert!(near < 5.0);
        assert!((far - 200.0).abs() < 0.1);
    }

    #[test]
    fn polar_distance_of_identical_colors_is_zero() {
        assert_eq!(polar_distance(44.0, 30.0, 44.0, 30.0), 0.0);
        // Opposite hues with one zero saturation collapse to the other radius.
        assert_eq!(polar_distance(0.0, 0.0, 180.0, 90.0), 90.0);
    }

    #[test]
    fn smart_pixel_caches_hsv() {
        let smart = SmartPixel::new(Pixel::new(255, 0, 0));
        assert_eq!(smart.hsv().hue, 0.0);
        assert_eq!(smart.hsv().saturation, 255.0);
        assert_eq!(smart.polar_distance(&HsvColor::new(0.0, 255.0, 255.0)), 0.0);
        assert_eq!(smart.rgb_distance(&Pixel::new(255, 0, 0)), 0.0);
    }
}
