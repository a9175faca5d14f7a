//! Pixel-rectangle crop extraction.
//!
//! Operates on integer rectangles in natural pixel space, as produced by
//! [`CropFrame::to_natural`](crate::geometry::CropFrame::to_natural). The
//! rectangle must already lie inside the image: for out-of-bounds selections
//! the pipeline extends the image first and shifts the rectangle with
//! [`ExtendMargins::offset`](crate::bounds::ExtendMargins::offset).
//!
//! # Example
//!
//! ```ignore
//! // Take the 50x50 block at (25, 25)
//! let cropped = extract_crop(&image, &PixelRect::new(25, 25, 50, 50))?;
//! ```

use thiserror::Error;

use crate::decode::{decode_image, DecodedImage};
use crate::encode::encode_image;
use crate::error::ReframeError;
use crate::geometry::PixelRect;

/// Errors raised by crop extraction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CropError {
    /// The rectangle reaches outside the image.
    #[error("Crop {rect:?} lies outside the {width}x{height} image")]
    OutOfBounds {
        rect: PixelRect,
        width: u32,
        height: u32,
    },

    /// The rectangle covers no pixels.
    #[error("Crop area is empty")]
    Empty,
}

/// Copy exactly `rect.width x rect.height` pixels out of `image`.
///
/// # Arguments
///
/// * `image` - Source image
/// * `rect` - Region to copy, in the source's natural pixels
///
/// # Returns
///
/// A new `DecodedImage` the size of `rect`, or a `CropError` if the
/// rectangle is empty or not fully inside the image.
pub fn extract_crop(image: &DecodedImage, rect: &PixelRect) -> Result<DecodedImage, CropError> {
    if rect.is_empty() {
        return Err(CropError::Empty);
    }
    if !image.dimensions().contains(rect) {
        return Err(CropError::OutOfBounds {
            rect: *rect,
            width: image.width,
            height: image.height,
        });
    }

    // Fast path: full-image crop returns a clone
    if rect.x == 0 && rect.y == 0 && rect.width == image.width && rect.height == image.height {
        return Ok(image.clone());
    }

    // Both offsets are non-negative after the containment check.
    let left = rect.x as usize;
    let top = rect.y as usize;
    let src_stride = image.width as usize * 3;
    let row_len = rect.width as usize * 3;

    let mut output = Vec::with_capacity(row_len * rect.height as usize);
    for y in top..top + rect.height as usize {
        let start = y * src_stride + left * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(rect.width, rect.height, output))
}

/// Decode `bytes`, extract `rect` and encode the result as JPEG.
pub fn crop_to_jpeg(bytes: &[u8], rect: &PixelRect, quality: u8) -> Result<Vec<u8>, ReframeError> {
    let image = decode_image(bytes)?;
    let cropped = extract_crop(&image, rect)?;
    Ok(encode_image(&cropped, quality)?)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
