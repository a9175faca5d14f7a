//! WASM bindings for the uncrop service.
//!
//! Both functions return promises. Requests go through `fetch` via reqwest's
//! browser backend.
//!
//! # Example
//!
//! ```typescript
//! const result = await crop_or_extend(bytes, { x: -50, y: 0, width: 1100, height: 800 }, apiKey);
//! if (result.extended) console.log("outpainted", result.margins());
//! const blob = new Blob([result.jpeg()], { type: "image/jpeg" });
//! ```

use reframe_core::bounds::ExtendMargins;
use reframe_core::geometry::PixelRect;
use reframe_core::outpaint::{resolve_credential, ClipdropClient, Outpainter};
use reframe_core::pipeline::crop_or_extend as core_crop_or_extend;
use wasm_bindgen::prelude::*;

use crate::types::{config_from_js, from_js, js_error, JsCropResult};

/// Extend an image by `margins` (`{left, right, up, down}`) through the uncrop API.
///
/// # Arguments
///
/// * `image` - Encoded source image
/// * `margins` - Pixels to add on each side
/// * `api_key` - User-supplied key; falls back to `config.api_key`
/// * `config` - Optional configuration object
///
/// # Returns
///
/// The extended image bytes as returned by the service.
#[wasm_bindgen]
pub async fn uncrop(
    image: Vec<u8>,
    margins: JsValue,
    api_key: Option<String>,
    config: JsValue,
) -> Result<js_sys::Uint8Array, JsValue> {
    let margins: ExtendMargins = from_js(margins)?;
    let config = config_from_js(config)?;
    let credential =
        resolve_credential(api_key.as_deref(), config.api_key.as_deref()).map_err(js_error)?;

    let client = ClipdropClient::from_config(&config).map_err(js_error)?;
    let bytes = client
        .extend(&image, &margins, &credential)
        .await
        .map_err(js_error)?;
    Ok(js_sys::Uint8Array::from(bytes.as_slice()))
}

/// Crop `rect` from `image`, outpainting first when `rect` leaves the image.
///
/// In-bounds crops never touch the network and need no API key.
#[wasm_bindgen]
pub async fn crop_or_extend(
    image: Vec<u8>,
    rect: JsValue,
    api_key: Option<String>,
    config: JsValue,
) -> Result<JsCropResult, JsValue> {
    let rect: PixelRect = from_js(rect)?;
    let config = config_from_js(config)?;
    let client = ClipdropClient::from_config(&config).map_err(js_error)?;

    let outcome = core_crop_or_extend(&image, &rect, &client, api_key.as_deref(), &config)
        .await
        .map_err(js_error)?;
    Ok(outcome.into())
}
