//! Reframe Core - crop and uncrop engine
//!
//! This crate maps crop selections made in a padded, zoomable workspace back
//! to natural image pixels, decides whether a crop needs the image to be
//! extended, drives the outpaint service when it does, and extracts the
//! final JPEG.
//!
//! # Module Structure
//!
//! - `geometry` - Coordinate conversions, crop placement and edge snapping
//! - `bounds` - Out-of-bounds detection and extension margins
//! - `outpaint` - Outpainter trait, ClipDrop client and credential resolution
//! - `decode` / `encode` - Image codecs (via the `image` crate)
//! - `transform` - Pixel crop extraction
//! - `pipeline` - Extend-or-crop orchestration
//! - `session` - Editing state behind one crop screen
//! - `storage` - API key persistence
//! - `naming` - Download file names
//! - `config` - Runtime configuration

pub mod bounds;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod naming;
pub mod outpaint;
pub mod pipeline;
pub mod session;
pub mod storage;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_support;

pub use bounds::{calculate_extend, is_out_of_bounds, ExtendMargins};
pub use config::ReframeConfig;
pub use error::ReframeError;
pub use geometry::{AspectPreset, CropFrame, ImageDimensions, PixelRect, Rect, Size};
pub use naming::output_file_name;
pub use outpaint::{ClipdropClient, OutpaintError, Outpainter, PaddingOutpainter};
pub use pipeline::{crop_or_extend, CropOutcome};
pub use session::{Axis, CropSession, Download};
pub use storage::{KeyValueStore, MemoryStore};
