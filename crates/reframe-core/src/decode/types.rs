//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::ImageDimensions;

/// Why an upload could not be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("Image data is empty")]
    Empty,

    /// The bytes are not in a recognized image format.
    #[error("Not a supported image file")]
    NotAnImage,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// EXIF orientation tag. Browsers lay out images with it applied, so
/// natural sizes here are post-orientation too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90CW,
    Transverse,
    Rotate270CW,
}

impl Orientation {
    /// Map a raw tag value. Values outside 1-8 are treated as upright.
    pub fn from_tag(value: u32) -> Self {
        const TABLE: [Orientation; 8] = [
            Orientation::Normal,
            Orientation::FlipHorizontal,
            Orientation::Rotate180,
            Orientation::FlipVertical,
            Orientation::Transpose,
            Orientation::Rotate90CW,
            Orientation::Transverse,
            Orientation::Rotate270CW,
        ];
        value
            .checked_sub(1)
            .and_then(|i| TABLE.get(i as usize))
            .copied()
            .unwrap_or_default()
    }

    /// Dimensions after this orientation has been applied.
    pub fn apply_to(self, dims: ImageDimensions) -> ImageDimensions {
        match self {
            Orientation::Transpose
            | Orientation::Rotate90CW
            | Orientation::Transverse
            | Orientation::Rotate270CW => ImageDimensions::new(dims.height, dims.width),
            _ => dims,
        }
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Natural dimensions.
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
