//! Generative outpainting ("uncrop") behind a trait seam.
//!
//! When a crop reaches past the image, the image is first grown by an
//! [`Outpainter`] so that the crop can be taken from real pixels. The
//! production implementation is [`ClipdropClient`], which posts the image to
//! the ClipDrop `uncrop/v1` endpoint. [`PaddingOutpainter`] fills the margins
//! locally and stands in for the service in tests and offline use.
//!
//! # Contract
//!
//! An implementation given an image of size `w x h` and margins
//! `{left, right, up, down}` returns an encoded image of size
//! `(w + left + right) x (h + up + down)` with the original content placed at
//! `(left, up)`. The pipeline checks the size; placement is trusted.

mod client;
mod credential;
mod padding;

pub use client::{parse_error_message, upload_file_meta, ClipdropClient};
pub use credential::resolve_credential;
pub use padding::PaddingOutpainter;

use thiserror::Error;

use crate::bounds::ExtendMargins;

/// Errors from the outpaint step.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutpaintError {
    /// No API key was entered and none is configured.
    #[error("ClipDrop API key not found. Please provide an API key below the crop area.")]
    MissingCredential,

    /// The service answered with a non-success status.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// The request never completed (connection, TLS, timeout).
    #[error("Network error: {0}")]
    Transport(String),

    /// The local fallback could not produce an image.
    #[error("Outpaint failed: {0}")]
    Local(String),
}

/// Something that can grow an image by the given margins.
///
/// Futures are not required to be `Send`; on wasm32 they run on the
/// browser's single thread.
#[allow(async_fn_in_trait)]
pub trait Outpainter {
    /// Extend `image` (encoded bytes) by `margins`, returning encoded bytes.
    async fn extend(
        &self,
        image: &[u8],
        margins: &ExtendMargins,
        credential: &str,
    ) -> Result<Vec<u8>, OutpaintError>;
}
