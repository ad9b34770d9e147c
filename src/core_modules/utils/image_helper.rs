pub mod image_helper {
    use std::fs::File;
    use std::io::BufWriter;
    use std::path::Path;

    use image::{ImageEncoder, ImageReader, RgbImage};

    use crate::error::CutError;

    /// Decodes any supported image file into 8-bit RGB.
    pub fn load_rgb(path: &Path) -> Result<RgbImage, CutError> {
        let image = ImageReader::open(path)
            .map_err(|e| CutError::ImageLoad(format!("{}: {e}", path.display())))?
            .with_guessed_format()
            .map_err(|e| CutError::ImageLoad(format!("{}: {e}", path.display())))?
            .decode()
            .map_err(|e| CutError::ImageLoad(format!("{}: {e}", path.display())))?;
        Ok(image.into_rgb8())
    }

    pub fn save_png(path: &Path, image: &RgbImage) -> Result<(), CutError> {
        let output = File::create(path)
            .map_err(|e| CutError::ImageSave(format!("{}: {e}", path.display())))?;
        let encoder = image::codecs::png::PngEncoder::new(BufWriter::new(output));

        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| CutError::ImageSave(format!("{}: {e}", path.display())))
    }
}
