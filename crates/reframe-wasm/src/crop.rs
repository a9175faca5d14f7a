//! WASM bindings for crop extraction, probing and naming.
//!
//! # Example
//!
//! ```typescript
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const { width, height } = probe_dimensions(bytes);
//! const jpeg = crop_image(bytes, { x: 10, y: 10, width: 200, height: 150 }, 92);
//! const name = output_file_name(file.name); // "holiday.jpg"
//! ```

use reframe_core::decode::probe_dimensions as core_probe;
use reframe_core::encode::DEFAULT_JPEG_QUALITY;
use reframe_core::geometry::PixelRect;
use reframe_core::naming::output_file_name as core_file_name;
use reframe_core::transform::crop_to_jpeg;
use wasm_bindgen::prelude::*;

use crate::types::{from_js, js_error, to_js};

/// Natural (orientation-corrected) size of an encoded image: `{width, height}`.
#[wasm_bindgen]
pub fn probe_dimensions(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let dims = core_probe(bytes).map_err(js_error)?;
    to_js(&dims)
}

/// Crop an in-bounds natural-pixel rectangle and encode it as JPEG.
///
/// # Errors
///
/// Fails if the bytes are not an image or the rectangle leaves the image;
/// use `crop_or_extend` for rectangles that need outpainting.
#[wasm_bindgen]
pub fn crop_image(bytes: &[u8], rect: JsValue, quality: Option<u8>) -> Result<Vec<u8>, JsValue> {
    let rect: PixelRect = from_js(rect)?;
    crop_to_jpeg(bytes, &rect, quality.unwrap_or(DEFAULT_JPEG_QUALITY)).map_err(js_error)
}

/// Download name for a crop of `original` (always ends in `.jpg`).
#[wasm_bindgen]
pub fn output_file_name(original: Option<String>) -> String {
    core_file_name(original.as_deref())
}
