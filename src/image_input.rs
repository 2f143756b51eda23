//! # Meal Image Intake
//!
//! Validates meal photos before they are sent to a vision model. The format is
//! detected from the file's magic bytes with `image::guess_format`; PNG, JPEG,
//! WebP and GIF are accepted. Accepted images are encoded as a base64 data URL.

use crate::ai_errors::AiError;
use base64::{engine::general_purpose, Engine};
use image::ImageFormat;
use std::path::Path;
use tracing::{debug, info};

/// Bytes needed before format detection is attempted
pub const MIN_FORMAT_BYTES: usize = 8;

/// A validated meal photo
#[derive(Debug, Clone, PartialEq)]
pub struct MealImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl MealImage {
    /// MIME type for the detected format
    pub fn mime_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            _ => "image/jpeg",
        }
    }

    /// Encode as a `data:` URL for chat-completion image parts
    pub fn to_data_url(&self) -> String {
        let encoded = general_purpose::STANDARD.encode(&self.bytes);
        debug!(encoded_len = encoded.len(), "Encoded meal image");
        format!("data:{};base64,{}", self.mime_type(), encoded)
    }
}

/// Check whether a detected format can be sent to the vision model
pub fn is_supported_format(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Gif
    )
}

/// Validate raw image bytes against the format list and size cap
pub fn validate_image_bytes(bytes: Vec<u8>, max_size: u64) -> Result<MealImage, AiError> {
    if bytes.len() < MIN_FORMAT_BYTES {
        return Err(AiError::ImageValidation(format!(
            "Image too small to detect format ({} bytes, need at least {MIN_FORMAT_BYTES})",
            bytes.len()
        )));
    }

    if bytes.len() as u64 > max_size {
        return Err(AiError::ImageValidation(format!(
            "Image is {} bytes, limit is {max_size}",
            bytes.len()
        )));
    }

    let format = image::guess_format(&bytes)
        .map_err(|e| AiError::ImageValidation(format!("Could not determine image format: {e}")))?;

    if !is_supported_format(format) {
        return Err(AiError::ImageValidation(format!(
            "Unsupported image format: {format:?}"
        )));
    }

    info!(?format, size = bytes.len(), "Validated meal image");
    Ok(MealImage { format, bytes })
}

/// Read and validate a meal photo from disk
///
/// The size is checked from file metadata before the file is read.
pub fn load_meal_image(path: &Path, max_size: u64) -> Result<MealImage, AiError> {
    let size = std::fs::metadata(path)?.len();
    if size > max_size {
        return Err(AiError::ImageValidation(format!(
            "{} is {size} bytes, limit is {max_size}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    validate_image_bytes(bytes, max_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";

    #[test]
    fn test_png_data_url() {
        let image = validate_image_bytes(PNG_HEADER.to_vec(), 1024).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.mime_type(), "image/png");
        assert!(image.to_data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_jpeg_and_gif_accepted() {
        let jpeg = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00".to_vec();
        assert_eq!(validate_image_bytes(jpeg, 1024).unwrap().mime_type(), "image/jpeg");

        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00".to_vec();
        assert_eq!(validate_image_bytes(gif, 1024).unwrap().mime_type(), "image/gif");
    }

    #[test]
    fn test_rejections() {
        let bmp = b"BM\x1e\x00\x00\x00\x00\x00\x00\x00\x1a\x00".to_vec();
        assert!(matches!(
            validate_image_bytes(bmp, 1024),
            Err(AiError::ImageValidation(_))
        ));

        let text = b"just some text, not an image".to_vec();
        assert!(validate_image_bytes(text, 1024).is_err());

        assert!(validate_image_bytes(vec![0x89, 0x50], 1024).is_err());
        assert!(validate_image_bytes(PNG_HEADER.to_vec(), 4).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PNG_HEADER).unwrap();

        let image = load_meal_image(file.path(), 1024).unwrap();
        assert_eq!(image.bytes, PNG_HEADER);

        assert!(load_meal_image(file.path(), 8).is_err());
        assert!(load_meal_image(Path::new("/nonexistent/meal.jpg"), 1024).is_err());
    }
}
