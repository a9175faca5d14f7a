//! Image encoding for crop output.
//!
//! # Examples
//!
//! ```ignore
//! use reframe_core::encode::{encode_jpeg, DEFAULT_JPEG_QUALITY};
//!
//! let pixels = vec![128u8; 100 * 100 * 3];
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, DEFAULT_JPEG_QUALITY).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_image, encode_jpeg, EncodeError, DEFAULT_JPEG_QUALITY};
