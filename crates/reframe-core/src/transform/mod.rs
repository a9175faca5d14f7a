//! Pixel transforms applied to the (possibly extended) source image.
//!
//! # Coordinate System
//!
//! - Rectangles are integer natural pixels, origin top-left
//! - Extraction never clamps: callers extend the image first

mod crop;

pub use crop::{crop_to_jpeg, extract_crop, CropError};
