//! Top-level error type joining the per-module errors.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::geometry::ImageDimensions;
use crate::outpaint::OutpaintError;
use crate::transform::CropError;

/// Any failure of the crop-or-extend sequence.
///
/// The `Display` text is what the user sees in the error banner.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReframeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error(transparent)]
    Outpaint(#[from] OutpaintError),

    /// The outpaint service returned an image of the wrong size.
    #[error("Extended image is {actual:?}, expected {expected:?}")]
    UnexpectedDimensions {
        expected: ImageDimensions,
        actual: ImageDimensions,
    },

    /// An operation needs a loaded image but none is present.
    #[error("No image loaded")]
    NoImage,

    /// The crop frame has no usable display size yet.
    #[error("Image has not been laid out yet")]
    NotLaidOut,
}
