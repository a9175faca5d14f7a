//! Image decoding for the crop pipeline.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG uploads into RGB pixel buffers
//! - Applying EXIF orientation so natural sizes match what the browser shows
//! - Probing natural dimensions without a full decode
//!
//! # Examples
//!
//! ```ignore
//! use reframe_core::decode::{decode_image, probe_dimensions};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let dims = probe_dimensions(&bytes).unwrap();
//! let image = decode_image(&bytes).unwrap();
//! assert_eq!(dims, image.dimensions());
//! ```

mod reader;
mod types;

pub use reader::{decode_image, extract_orientation, probe_dimensions, sniff_mime};
pub use types::{DecodeError, DecodedImage, Orientation};
