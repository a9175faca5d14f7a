//! WASM bindings for crop geometry.
//!
//! Rectangles are plain `{x, y, width, height}` objects. Percent rectangles
//! use the padded percent space of the crop widget; pixel rectangles use
//! integer natural pixels and may have a negative origin.
//!
//! # Example
//!
//! ```typescript
//! const frame = new JsCropFrame(img.width, img.height, img.naturalWidth, img.naturalHeight);
//! const pixels = frame.to_natural(percentCrop); // { x: -50, y: 0, width: 1100, height: 800 }
//! ```

use reframe_core::geometry::{
    snap_crop as core_snap_crop, AspectPreset, CropFrame, ImageDimensions, PixelRect, Rect, Size,
    DEFAULT_PADDING,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::{from_js, to_js};

/// Geometry frame: display size, natural size and padding.
#[wasm_bindgen]
pub struct JsCropFrame {
    inner: CropFrame,
}

#[wasm_bindgen]
impl JsCropFrame {
    /// Create a frame.
    ///
    /// # Arguments
    /// * `display_width`, `display_height` - Layout size of the image element
    /// * `natural_width`, `natural_height` - Intrinsic pixel size
    /// * `padding` - Margin around the image in display units (default 1000)
    #[wasm_bindgen(constructor)]
    pub fn new(
        display_width: f64,
        display_height: f64,
        natural_width: u32,
        natural_height: u32,
        padding: Option<f64>,
    ) -> Result<JsCropFrame, JsValue> {
        let inner = CropFrame::new(
            Size::new(display_width, display_height),
            ImageDimensions::new(natural_width, natural_height),
        )
        .with_padding(padding.unwrap_or(DEFAULT_PADDING));

        if !inner.is_valid() {
            return Err(JsValue::from_str("Invalid crop frame: sizes must be positive"));
        }
        Ok(JsCropFrame { inner })
    }

    /// Padded percent rectangle to natural pixels.
    pub fn to_natural(&self, percent: JsValue) -> Result<JsValue, JsValue> {
        let percent: Rect = from_js(percent)?;
        to_js(&self.inner.to_natural(&percent))
    }

    /// Natural pixel rectangle to padded percent.
    pub fn to_percent(&self, rect: JsValue) -> Result<JsValue, JsValue> {
        let rect: PixelRect = from_js(rect)?;
        to_js(&self.inner.to_percent(&rect))
    }

    /// Percent rectangle covering exactly the image.
    pub fn full_image(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.full_image())
    }

    /// Largest centred rectangle of `aspect` (width / height) inside the image.
    pub fn centered_aspect(&self, aspect: Option<f64>) -> Result<JsValue, JsValue> {
        to_js(&self.inner.centered_aspect(aspect))
    }

    /// Image edges in percent: `{left, top, right, bottom}`.
    pub fn image_edges(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.image_edges())
    }

    /// `[width, height]` in natural pixels of a percent rectangle.
    pub fn natural_size(&self, percent: JsValue) -> Result<Vec<u32>, JsValue> {
        let percent: Rect = from_js(percent)?;
        let (w, h) = self.inner.natural_size(&percent);
        Ok(vec![w, h])
    }

    pub fn with_natural_width(&self, percent: JsValue, width: u32) -> Result<JsValue, JsValue> {
        let percent: Rect = from_js(percent)?;
        to_js(&self.inner.with_natural_width(&percent, width))
    }

    pub fn with_natural_height(&self, percent: JsValue, height: u32) -> Result<JsValue, JsValue> {
        let percent: Rect = from_js(percent)?;
        to_js(&self.inner.with_natural_height(&percent, height))
    }

    /// Snap a moved or resized percent rectangle to the image edges.
    pub fn snap(
        &self,
        zoom: f64,
        prev: JsValue,
        next: JsValue,
        aspect_locked: bool,
    ) -> Result<JsValue, JsValue> {
        let prev: Rect = from_js(prev)?;
        let next: Rect = from_js(next)?;
        to_js(&core_snap_crop(&self.inner, zoom, &prev, &next, aspect_locked))
    }
}

#[derive(Serialize)]
struct PresetInfo {
    label: &'static str,
    ratio: Option<f64>,
}

fn preset_table() -> Vec<PresetInfo> {
    AspectPreset::ALL
        .into_iter()
        .map(|p| PresetInfo {
            label: p.label(),
            ratio: p.ratio(),
        })
        .collect()
}

/// Aspect presets for the toolbar: `[{label: "Free"}, {label: "1:1", ratio: 1}, ...]`.
#[wasm_bindgen]
pub fn aspect_presets() -> Result<JsValue, JsValue> {
    to_js(&preset_table())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_table_order() {
        let labels: Vec<_> = preset_table().iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["Free", "1:1", "5:4", "4:3", "16:9", "9:16"]);
        assert_eq!(preset_table()[0].ratio, None);
    }
}
