// THEORY (1D Pixel Heuristics):
// The `Pixel` module is the most fundamental unit of the cutter. It is a "dumb"
// data container for a single RGB pixel plus the few single-pixel heuristics the
// classifier needs: hue angle and HSV saturation. Nothing here looks at a
// neighbor; distances between two colors live in `color_metric`.
//
// Saturation is reported on the same 0..255 scale as the channels so it can be
// compared directly with reference colors written as HSV byte triples.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type Hue = f64;
    pub type Saturation = f64;
    pub type Value = f64;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    /// A color expressed as hue (degrees, 0..360) with saturation and value on a 0..255 scale.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct HsvColor {
        pub hue: Hue,
        pub saturation: Saturation,
        pub value: Value,
    }

    impl HsvColor {
        pub const fn new(hue: Hue, saturation: Saturation, value: Value) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }
    }

    impl Pixel {
        pub const BLACK: Pixel = Pixel::new(0, 0, 0);
        pub const WHITE: Pixel = Pixel::new(255, 255, 255);

        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        fn maximum_channel(&self) -> Channel {
            self.red.max(self.green.max(self.blue))
        }

        fn minimum_channel(&self) -> Channel {
            self.red.min(self.green.min(self.blue))
        }

        /// Hue angle in degrees [0, 360).
        ///
        /// Achromatic pixels (all channels equal) have no defined hue and report 0.
        pub fn hue(&self) -> Hue {
            let maximum_channel = self.maximum_channel();
            let chroma = (maximum_channel - self.minimum_channel()) as f64;
            if chroma == 0.0 {
                return 0.0;
            }

            let (red, green, blue) = (self.red as f64, self.green as f64, self.blue as f64);
            let (base_difference, sector_offset) = if maximum_channel == self.red {
                (green - blue, 0.0)
            } else if maximum_channel == self.green {
                (blue - red, 2.0)
            } else {
                (red - green, 4.0)
            };

            let mut hue_degrees = (base_difference / chroma + sector_offset) * 60.0;
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }
            hue_degrees
        }

        /// HSV saturation scaled to 0..255 (chroma / value). Black reports 0.
        pub fn saturation_hsv(&self) -> Saturation {
            let maximum_channel = self.maximum_channel();
            if maximum_channel == 0 {
                return 0.0;
            }
            let chroma = (maximum_channel - self.minimum_channel()) as f64;
            255.0 * chroma / maximum_channel as f64
        }

        /// HSV value, i.e. the brightest channel.
        pub fn value_hsv(&self) -> Value {
            self.maximum_channel() as f64
        }

        pub fn to_hsv(&self) -> HsvColor {
            HsvColor::new(self.hue(), self.saturation_hsv(), self.value_hsv())
        }
    }

    impl From<image::Rgb<u8>> for Pixel {
        fn from(rgb: image::Rgb<u8>) -> Self {
            let [red, green, blue] = rgb.0;
            Pixel::new(red, green, blue)
        }
    }

    impl From<Pixel> for image::Rgb<u8> {
        fn from(pixel: Pixel) -> Self {
            image::Rgb([pixel.red, pixel.green, pixel.blue])
        }
    }
}
