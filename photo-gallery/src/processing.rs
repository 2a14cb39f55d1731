use crate::models::ImageLimits;
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, GenericImageView};

/// Error type for image processing
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    /// Bytes could not be decoded as an image
    Decode(String),
    /// Decoded image violates the configured limits
    Dimensions(String),
    /// Encoding to JPEG failed
    Encode(String),
}

impl std::fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingError::Decode(msg) => write!(f, "Image decode error: {}", msg),
            ProcessingError::Dimensions(msg) => write!(f, "Invalid image dimensions: {}", msg),
            ProcessingError::Encode(msg) => write!(f, "Image encode error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessingError {}

/// Checks width/height against the import limits
pub fn validate_dimensions(
    width: u32,
    height: u32,
    limits: &ImageLimits,
) -> Result<(), ProcessingError> {
    if width == 0 || height == 0 {
        return Err(ProcessingError::Dimensions(format!(
            "{}x{} has a zero side",
            width, height
        )));
    }
    if width < limits.min_dimension || height < limits.min_dimension {
        return Err(ProcessingError::Dimensions(format!(
            "{}x{} is smaller than {}x{}",
            width, height, limits.min_dimension, limits.min_dimension
        )));
    }
    if width > limits.max_dimension || height > limits.max_dimension {
        return Err(ProcessingError::Dimensions(format!(
            "{}x{} exceeds {}x{}",
            width, height, limits.max_dimension, limits.max_dimension
        )));
    }
    Ok(())
}

/// Resize dimensions maintaining aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    let ratio =
        (original_width as f32 / max_width as f32).max(original_height as f32 / max_height as f32);

    if ratio > 1.0 {
        let new_width = ((original_width as f32 / ratio).round() as u32).clamp(1, max_width);
        let new_height = ((original_height as f32 / ratio).round() as u32).clamp(1, max_height);
        (new_width, new_height)
    } else {
        (original_width, original_height)
    }
}

/// Decodes and validates an image, downscaling it when a side exceeds the threshold
pub fn prepare_image(bytes: &[u8], limits: &ImageLimits) -> Result<DynamicImage, ProcessingError> {
    let img = image::load_from_memory(bytes).map_err(|e| ProcessingError::Decode(e.to_string()))?;
    let (width, height) = img.dimensions();
    validate_dimensions(width, height, limits)?;

    let (new_width, new_height) = calculate_resize_dimensions(
        width,
        height,
        limits.downscale_threshold,
        limits.downscale_threshold,
    );

    if (new_width, new_height) == (width, height) {
        return Ok(img);
    }

    log::debug!(
        "Downscaling {}x{} to {}x{}",
        width,
        height,
        new_width,
        new_height
    );
    Ok(img.resize_exact(new_width, new_height, FilterType::Lanczos3))
}

/// Encodes an image as JPEG with the given quality
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| ProcessingError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// True when the bytes decode to an image with non-zero dimensions
pub fn is_decodable(bytes: &[u8]) -> bool {
    match image::load_from_memory(bytes) {
        Ok(img) => img.width() > 0 && img.height() > 0,
        Err(_) => false,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use image::{ImageBuffer, Rgb};

    /// Encodes a solid-color JPEG of the given size
    pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 255) as u8, (y % 255) as u8, 128u8])
        });
        let mut buffer = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, 90)
            .encode_image(&img)
            .unwrap();
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::jpeg_bytes;
    use super::*;

    #[test]
    fn test_resize_dimensions() {
        // Image larger than max
        let (w, h) = calculate_resize_dimensions(4000, 3000, 2048, 2048);
        assert_eq!(w, 2048);
        assert_eq!(h, 1536);

        // Image smaller than max
        let (w, h) = calculate_resize_dimensions(800, 600, 2048, 2048);
        assert_eq!(w, 800);
        assert_eq!(h, 600);
    }

    #[test]
    fn test_validate_dimensions() {
        let limits = ImageLimits::default();
        assert!(validate_dimensions(100, 100, &limits).is_ok());
        assert!(validate_dimensions(4096, 4096, &limits).is_ok());
        assert!(validate_dimensions(0, 500, &limits).is_err());
        assert!(validate_dimensions(50, 50, &limits).is_err());
        assert!(validate_dimensions(99, 1000, &limits).is_err());
        assert!(validate_dimensions(4097, 200, &limits).is_err());
    }

    #[test]
    fn test_prepare_downscales_large_images() {
        let limits = ImageLimits {
            downscale_threshold: 200,
            ..ImageLimits::default()
        };
        let img = prepare_image(&jpeg_bytes(400, 300), &limits).unwrap();
        assert_eq!(img.dimensions(), (200, 150));
    }

    #[test]
    fn test_prepare_rejects_garbage() {
        let result = prepare_image(b"definitely not an image", &ImageLimits::default());
        assert!(matches!(result, Err(ProcessingError::Decode(_))));
    }

    #[test]
    fn test_encoded_jpeg_is_decodable() {
        let img = prepare_image(&jpeg_bytes(120, 160), &ImageLimits::default()).unwrap();
        let encoded = encode_jpeg(&img, 85).unwrap();
        assert!(is_decodable(&encoded));
        assert!(!is_decodable(b"\xFF\xD8 broken"));
    }
}
