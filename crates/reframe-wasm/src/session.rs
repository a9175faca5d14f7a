//! WASM bindings for the interactive crop session.
//!
//! `JsCropSession` owns the page state: the loaded image, the live and
//! committed crop, aspect lock, zoom and pan, the API key (remembered in
//! `localStorage`), the processing flag, the error banner and the preview.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsCropSession();
//! session.load_image(bytes, file.name);
//! session.set_display_size(img.width, img.height);
//! session.set_aspect("16:9");
//! const result = await session.generate_crop();
//! const { file_name } = await session.download();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use reframe_core::geometry::{AspectPreset, Rect, Size};
use reframe_core::outpaint::ClipdropClient;
use reframe_core::session::{Axis, CropSession};
use reframe_core::ReframeError;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::storage::WebStorage;
use crate::types::{config_from_js, from_js, js_error, to_js, JsCropResult, JsDownload};

type Shared = Rc<RefCell<CropSession<WebStorage>>>;

fn parse_axis(name: &str) -> Option<Axis> {
    match name.trim().to_ascii_lowercase().as_str() {
        "width" | "w" => Some(Axis::Width),
        "height" | "h" => Some(Axis::Height),
        _ => None,
    }
}

/// Typed-in dimension to whole pixels. Non-finite and negative input is rejected.
fn parse_dimension(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 {
        Some(value.round().min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

/// Snapshot the crop and build a client, then release the session.
///
/// The session is never borrowed across the request.
async fn run_crop(inner: &Shared) -> Result<reframe_core::CropOutcome, ReframeError> {
    let (request, client) = {
        let mut session = inner.borrow_mut();
        let request = session.prepare_crop();
        (request, ClipdropClient::from_config(session.config()))
    };
    request?.run(&client?).await
}

/// Crop session for the page.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: Shared,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Create a session. `config` is an optional configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropSession, JsValue> {
        let config = config_from_js(config)?;
        Ok(JsCropSession {
            inner: Rc::new(RefCell::new(CropSession::new(config, WebStorage::local()))),
        })
    }

    /// Load an uploaded file. Returns its natural `{width, height}`.
    ///
    /// On failure the previous image stays and `error` is set.
    pub fn load_image(&self, bytes: Vec<u8>, file_name: Option<String>) -> Result<JsValue, JsValue> {
        let dims = self
            .inner
            .borrow_mut()
            .load_image(bytes, file_name.as_deref())
            .map_err(js_error)?;
        to_js(&dims)
    }

    /// Forget the image ("upload new").
    pub fn reset(&self) {
        self.inner.borrow_mut().reset();
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.borrow().has_image()
    }

    /// The image element was laid out. Returns the initial full-image crop.
    pub fn set_display_size(&self, width: f64, height: f64) -> Result<JsValue, JsValue> {
        let rect = self
            .inner
            .borrow_mut()
            .set_display_size(Size::new(width, height))
            .map_err(js_error)?;
        to_js(&rect)
    }

    /// Choose an aspect preset by toolbar label (`"Free"`, `"1:1"`, `"16:9"`, ...).
    pub fn set_aspect(&self, label: &str) -> Result<JsValue, JsValue> {
        let preset = AspectPreset::from_label(label)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown aspect preset: {label}")))?;
        to_js(&self.inner.borrow_mut().set_aspect(preset))
    }

    /// Current aspect preset label.
    #[wasm_bindgen(getter)]
    pub fn aspect(&self) -> String {
        self.inner.borrow().aspect().label().to_string()
    }

    /// Live crop change from the widget (percent rect). Returns the possibly snapped rect.
    pub fn update_crop(&self, rect: JsValue) -> Result<JsValue, JsValue> {
        let rect: Rect = from_js(rect)?;
        to_js(&self.inner.borrow_mut().update_crop(rect))
    }

    /// Drag finished.
    pub fn complete_crop(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow_mut().complete_crop())
    }

    /// Live crop in percent, or `undefined`.
    pub fn crop(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().crop())
    }

    /// Typed-in width or height. Invalid numbers leave the crop unchanged.
    pub fn set_dimension(&self, axis: &str, value: f64) -> Result<JsValue, JsValue> {
        let axis =
            parse_axis(axis).ok_or_else(|| JsValue::from_str(&format!("Unknown axis: {axis}")))?;
        let mut session = self.inner.borrow_mut();
        let rect = match parse_dimension(value) {
            Some(value) => session.set_dimension(axis, value),
            None => session.crop(),
        };
        to_js(&rect)
    }

    /// Mouse wheel. Returns the new zoom.
    pub fn zoom_by_wheel(&self, delta_y: f64) -> f64 {
        self.inner.borrow_mut().zoom_by_wheel(delta_y)
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.borrow().view().zoom
    }

    pub fn begin_pan(&self, x: f64, y: f64) {
        self.inner.borrow_mut().begin_pan(x, y);
    }

    /// Pointer move. Returns the pan offset `{x, y}`.
    pub fn pan_to(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow_mut().pan_to(x, y))
    }

    pub fn end_pan(&self) {
        self.inner.borrow_mut().end_pan();
    }

    #[wasm_bindgen(getter)]
    pub fn is_panning(&self) -> bool {
        self.inner.borrow().is_panning()
    }

    /// Shift pressed or released.
    pub fn set_precision(&self, held: bool) {
        self.inner.borrow_mut().set_precision(held);
    }

    /// Committed crop in natural pixels, or `undefined`.
    pub fn natural_crop(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().natural_crop())
    }

    /// `[width, height]` of the live crop in natural pixels.
    pub fn dimensions(&self) -> Option<Vec<u32>> {
        self.inner.borrow().dimensions().map(|(w, h)| vec![w, h])
    }

    /// True when generating the crop will call the uncrop service.
    #[wasm_bindgen(getter)]
    pub fn needs_uncrop(&self) -> bool {
        self.inner.borrow().needs_uncrop()
    }

    #[wasm_bindgen(getter)]
    pub fn credential(&self) -> String {
        self.inner.borrow().credential().to_string()
    }

    /// Store the API key and remember it for the next visit.
    #[wasm_bindgen(setter)]
    pub fn set_credential(&self, value: &str) {
        self.inner.borrow_mut().set_credential(value);
    }

    #[wasm_bindgen(getter)]
    pub fn is_processing(&self) -> bool {
        self.inner.borrow().is_processing()
    }

    /// Error banner text, if any.
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.inner.borrow().error().map(String::from)
    }

    pub fn dismiss_error(&self) {
        self.inner.borrow_mut().dismiss_error();
    }

    /// Current preview, if a crop has been generated.
    pub fn preview(&self) -> Option<JsCropResult> {
        self.inner.borrow().preview().cloned().map(JsCropResult::from)
    }

    /// Back to editing.
    pub fn clear_preview(&self) {
        self.inner.borrow_mut().clear_preview();
    }

    /// Output file name for the current image.
    pub fn download_name(&self) -> String {
        self.inner.borrow().download_name()
    }

    /// Generate the crop and keep it as the preview.
    ///
    /// Resolves to a `JsCropResult`; rejects with the banner message.
    pub fn generate_crop(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let result = run_crop(&inner).await;
            let mut session = inner.borrow_mut();
            let outcome = session.finish_processing(result).map_err(js_error)?;
            Ok(JsCropResult::from(outcome.clone()).into())
        })
    }

    /// Download the preview, or crop afresh when there is none.
    ///
    /// Resolves to a `JsDownload`. A fresh crop does not become the preview.
    pub fn download(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let ready = inner.borrow().preview_download();
            if let Some(download) = ready {
                return Ok(JsDownload::from(download).into());
            }

            let result = run_crop(&inner).await;
            let download = inner.borrow_mut().finish_download(result).map_err(js_error)?;
            Ok(JsDownload::from(download).into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_axis() {
        assert_eq!(parse_axis("width"), Some(Axis::Width));
        assert_eq!(parse_axis(" Height "), Some(Axis::Height));
        assert_eq!(parse_axis("depth"), None);
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension(640.0), Some(640));
        assert_eq!(parse_dimension(99.6), Some(100));
        assert_eq!(parse_dimension(-1.0), None);
        assert_eq!(parse_dimension(f64::NAN), None);
        assert_eq!(parse_dimension(f64::INFINITY), None);
    }
}
