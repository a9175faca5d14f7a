//! WASM-compatible wrapper types and conversion helpers.
//!
//! Plain data (rectangles, margins, dimensions, configuration) crosses the
//! boundary as ordinary JavaScript objects through `serde-wasm-bindgen`.
//! Byte payloads use dedicated classes so that they arrive as `Uint8Array`
//! rather than arrays of numbers.

use reframe_core::bounds::ExtendMargins;
use reframe_core::pipeline::CropOutcome;
use reframe_core::session::Download;
use reframe_core::ReframeConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Convert any displayable error into a JavaScript string error.
pub(crate) fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Deserialize a JavaScript object.
pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

/// Serialize to a JavaScript object. `None` becomes `undefined`.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

/// Configuration from an optional JavaScript object; missing fields default.
pub(crate) fn config_from_js(value: JsValue) -> Result<ReframeConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        Ok(ReframeConfig::default())
    } else {
        from_js(value)
    }
}

/// A finished crop for JavaScript.
///
/// `jpeg()` copies the encoded bytes into a `Uint8Array`; wrap it in a
/// `Blob` with type `image/jpeg` for preview or download.
#[wasm_bindgen]
pub struct JsCropResult {
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
    margins: Option<ExtendMargins>,
}

#[wasm_bindgen]
impl JsCropResult {
    /// Output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the image was outpainted before cropping
    #[wasm_bindgen(getter)]
    pub fn extended(&self) -> bool {
        self.margins.is_some()
    }

    /// Margins used for outpainting, or `undefined`.
    pub fn margins(&self) -> Result<JsValue, JsValue> {
        to_js(&self.margins)
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.jpeg.len()
    }

    /// JPEG bytes as `Uint8Array` (a copy).
    pub fn jpeg(&self) -> Vec<u8> {
        self.jpeg.clone()
    }
}

impl From<CropOutcome> for JsCropResult {
    fn from(outcome: CropOutcome) -> Self {
        Self {
            jpeg: outcome.jpeg,
            width: outcome.width,
            height: outcome.height,
            margins: outcome.margins,
        }
    }
}

/// A file ready to save: name plus JPEG bytes.
#[wasm_bindgen]
pub struct JsDownload {
    file_name: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsDownload {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<Download> for JsDownload {
    fn from(download: Download) -> Self {
        Self {
            file_name: download.file_name,
            bytes: download.bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_result_from_outcome() {
        let result = JsCropResult::from(CropOutcome {
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: 40,
            height: 30,
            margins: Some(ExtendMargins::new(5, 0, 0, 0)),
        });
        assert_eq!(result.width(), 40);
        assert_eq!(result.height(), 30);
        assert!(result.extended());
        assert_eq!(result.byte_length(), 4);
        assert_eq!(result.jpeg(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn test_download_from_core() {
        let download = JsDownload::from(Download {
            file_name: "shot.jpg".to_string(),
            bytes: vec![1, 2, 3],
        });
        assert_eq!(download.file_name(), "shot.jpg");
        assert_eq!(download.bytes(), vec![1, 2, 3]);
    }
}
