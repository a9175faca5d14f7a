//! JPEG encoding for crop output.
//!
//! Every crop, extended or not, leaves the pipeline as a JPEG. The output
//! file name always ends in `.jpg`, so no other format is offered.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Quality used when the caller does not choose one.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Why a cropped buffer could not be written out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Buffer length is not `width * height * 3`.
    #[error("Crop buffer holds {actual} bytes, expected {expected}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// A zero-sized crop reached the encoder.
    #[error("Cannot encode a {width}x{height} crop")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Failed to encode crop as JPEG: {0}")]
    EncodingFailed(String),
}

/// Write a row-major RGB crop buffer as a JPEG file.
///
/// `quality` is clamped to 1-100; the session passes
/// `ReframeConfig::jpeg_quality`.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut out = Cursor::new(Vec::with_capacity(expected / 8));
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out.into_inner())
}

/// Encode an extracted crop.
pub fn encode_image(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg(&image.pixels, image.width, image.height, quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;

    fn is_jpeg(bytes: &[u8]) -> bool {
        bytes.starts_with(&[0xFF, 0xD8]) && bytes.ends_with(&[0xFF, 0xD9])
    }

    #[test]
    fn test_crop_output_is_jpeg() {
        let crop = DecodedImage::new(40, 30, vec![90u8; 40 * 30 * 3]);
        assert!(is_jpeg(&encode_image(&crop, DEFAULT_JPEG_QUALITY).unwrap()));
    }

    #[test]
    fn test_out_of_range_quality_is_clamped() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(is_jpeg(&encode_jpeg(&pixels, 10, 10, 0).unwrap()));
        assert!(is_jpeg(&encode_jpeg(&pixels, 10, 10, 255).unwrap()));
    }

    #[test]
    fn test_short_crop_buffer_rejected() {
        let short = vec![128u8; 99 * 100 * 3];
        assert_eq!(
            encode_jpeg(&short, 100, 100, 90),
            Err(EncodeError::InvalidPixelData {
                expected: 30000,
                actual: 29700
            })
        );
    }

    #[test]
    fn test_zero_sized_crop_rejected() {
        assert_eq!(
            encode_jpeg(&[], 0, 100, 90),
            Err(EncodeError::InvalidDimensions {
                width: 0,
                height: 100
            })
        );
        assert_eq!(
            encode_jpeg(&[], 100, 0, 90).map_err(|e| e.to_string()),
            Err("Cannot encode a 100x0 crop".to_string())
        );
    }

    #[test]
    fn test_encoded_crop_keeps_its_size() {
        let crop = DecodedImage::new(37, 21, vec![200u8; 37 * 21 * 3]);
        let jpeg = encode_image(&crop, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(decode_image(&jpeg).unwrap().dimensions(), crop.dimensions());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
