//! WASM bindings for out-of-bounds detection.

use reframe_core::bounds::{calculate_extend as core_extend, is_out_of_bounds as core_oob};
use reframe_core::geometry::PixelRect;
use wasm_bindgen::prelude::*;

use crate::types::{from_js, to_js};

/// Margins needed for a natural-pixel rectangle to fit the image.
///
/// # Returns
///
/// `undefined` when the rectangle is inside the image, otherwise
/// `{left, right, up, down}`.
#[wasm_bindgen]
pub fn calculate_extend(rect: JsValue, image_width: u32, image_height: u32) -> Result<JsValue, JsValue> {
    let rect: PixelRect = from_js(rect)?;
    to_js(&core_extend(&rect, image_width, image_height))
}

/// True when a natural-pixel rectangle reaches outside the image.
#[wasm_bindgen]
pub fn is_out_of_bounds(rect: JsValue, image_width: u32, image_height: u32) -> Result<bool, JsValue> {
    let rect: PixelRect = from_js(rect)?;
    Ok(core_oob(&rect, image_width, image_height))
}
