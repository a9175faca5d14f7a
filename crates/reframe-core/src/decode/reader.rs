//! Image decoding with EXIF orientation handling.
//!
//! Browsers display images with their EXIF orientation applied, and report
//! natural sizes after that rotation. Decoding here does the same so that
//! natural-pixel crop rectangles line up with what the user saw.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};
use crate::geometry::ImageDimensions;

/// Decode an image (JPEG or PNG) from bytes, applying EXIF orientation.
///
/// # Errors
///
/// - `DecodeError::Empty` for an empty buffer
/// - `DecodeError::NotAnImage` if the format is not recognized
/// - `DecodeError::CorruptedFile` if decoding fails part way
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = open(bytes)?;
    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, extract_orientation(bytes));
    Ok(DecodedImage::from_rgb_image(oriented.into_rgb8()))
}

/// Read the natural (orientation-corrected) dimensions without decoding pixels.
pub fn probe_dimensions(bytes: &[u8]) -> Result<ImageDimensions, DecodeError> {
    let (width, height) = open(bytes)?
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(extract_orientation(bytes).apply_to(ImageDimensions::new(width, height)))
}

/// MIME type of the encoded image, if recognized.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

fn open(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::NotAnImage);
    }
    Ok(reader)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from_tag)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{encoded_gradient, pixel_at};
    use image::ImageFormat;

    #[test]
    fn test_decode_png() {
        let bytes = encoded_gradient(40, 30, ImageFormat::Png);
        let img = decode_image(&bytes).unwrap();

        assert_eq!(img.dimensions(), ImageDimensions::new(40, 30));
        assert_eq!(img.pixels.len(), 40 * 30 * 3);
        assert_eq!(pixel_at(&img, 7, 3), [7, 3, 128]);
    }

    #[test]
    fn test_decode_jpeg() {
        let bytes = encoded_gradient(16, 8, ImageFormat::Jpeg);
        let img = decode_image(&bytes).unwrap();
        assert_eq!(img.dimensions(), ImageDimensions::new(16, 8));
    }

    #[test]
    fn test_probe_matches_decode() {
        let bytes = encoded_gradient(33, 17, ImageFormat::Png);
        assert_eq!(
            probe_dimensions(&bytes).unwrap(),
            decode_image(&bytes).unwrap().dimensions()
        );
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert_eq!(decode_image(&[]), Err(DecodeError::Empty));
        assert_eq!(probe_dimensions(&[]), Err(DecodeError::Empty));
    }

    #[test]
    fn test_decode_not_an_image() {
        let text = b"this is a text file, not a picture";
        assert_eq!(decode_image(text), Err(DecodeError::NotAnImage));
        assert_eq!(probe_dimensions(text), Err(DecodeError::NotAnImage));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = encoded_gradient(40, 30, ImageFormat::Png);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(
            sniff_mime(&encoded_gradient(2, 2, ImageFormat::Png)),
            Some("image/png")
        );
        assert_eq!(
            sniff_mime(&encoded_gradient(2, 2, ImageFormat::Jpeg)),
            Some("image/jpeg")
        );
        assert_eq!(sniff_mime(b"nope"), None);
    }

    #[test]
    fn test_no_exif_is_normal() {
        let bytes = encoded_gradient(4, 4, ImageFormat::Jpeg);
        assert_eq!(extract_orientation(&bytes), Orientation::Normal);
        assert_eq!(extract_orientation(&[0x00, 0x01]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90() {
        let pixels = vec![
            255, 0, 0, // Red (left)
            0, 255, 0, // Green (right)
        ];
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_raw(2, 1, pixels).unwrap());

        let rotated = apply_orientation(img, Orientation::Rotate90CW).into_rgb8();
        assert_eq!(rotated.dimensions(), (1, 2));
        assert_eq!(rotated.get_pixel(0, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let pixels = vec![255, 0, 0, 0, 255, 0];
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_raw(2, 1, pixels).unwrap());

        let flipped = apply_orientation(img, Orientation::FlipHorizontal).into_rgb8();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(flipped.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
