//! Crop session: the state behind one editing screen.
//!
//! [`CropSession`] holds everything the UI mutates while a user works on an
//! image: the loaded source, the live and committed crop (padded percent),
//! the aspect lock, zoom and pan, the precision modifier, the processing
//! flag, the error banner and the preview. Each UI event maps to one method.
//!
//! Long-running work is split in three so that callers which cannot hold a
//! `&mut` borrow across an `.await` (JavaScript promises) can still drive it:
//! [`CropSession::prepare_crop`] snapshots what the crop needs,
//! [`CropRequest::run`] does the async part, and
//! [`CropSession::finish_processing`] records the result.
//! [`CropSession::generate_crop`] chains the three.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::bounds::is_out_of_bounds;
use crate::config::ReframeConfig;
use crate::decode::{probe_dimensions, DecodeError};
use crate::error::ReframeError;
use crate::geometry::{
    AspectPreset, CropFrame, ImageDimensions, PixelRect, Point, Rect, Size, SnapMode, Snapper,
    ViewState,
};
use crate::naming::output_file_name;
use crate::outpaint::Outpainter;
use crate::pipeline::{crop_or_extend, CropOutcome};
use crate::storage::{CredentialStore, KeyValueStore};

/// Zoom change per unit of wheel `deltaY`.
pub const WHEEL_ZOOM_STEP: f64 = -0.001;

/// Which typed-in dimension changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Width,
    Height,
}

/// A file ready to be saved by the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
struct LoadedImage {
    bytes: Rc<[u8]>,
    file_name: Option<String>,
    dimensions: ImageDimensions,
}

/// Everything needed to run one crop, detached from the session.
#[derive(Debug, Clone)]
pub struct CropRequest {
    source: Rc<[u8]>,
    rect: PixelRect,
    credential: String,
    config: ReframeConfig,
}

impl CropRequest {
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Run the crop, outpainting first if needed.
    pub async fn run<O: Outpainter>(&self, outpainter: &O) -> Result<CropOutcome, ReframeError> {
        crop_or_extend(
            &self.source,
            &self.rect,
            outpainter,
            Some(&self.credential),
            &self.config,
        )
        .await
    }
}

pub struct CropSession<S: KeyValueStore> {
    config: ReframeConfig,
    credentials: CredentialStore<S>,
    credential: String,
    image: Option<LoadedImage>,
    display: Option<Size>,
    crop: Option<Rect>,
    completed: Option<Rect>,
    aspect: AspectPreset,
    view: ViewState,
    pan_anchor: Option<Point>,
    precision: bool,
    processing: bool,
    error: Option<String>,
    preview: Option<CropOutcome>,
}

impl<S: KeyValueStore> CropSession<S> {
    /// Create a session, restoring the saved API key from `store`.
    pub fn new(config: ReframeConfig, store: S) -> Self {
        let credentials = CredentialStore::new(store, config.storage_key.clone());
        let credential = credentials.load();
        Self {
            config,
            credentials,
            credential,
            image: None,
            display: None,
            crop: None,
            completed: None,
            aspect: AspectPreset::Free,
            view: ViewState::default(),
            pan_anchor: None,
            precision: false,
            processing: false,
            error: None,
            preview: None,
        }
    }

    // --- image lifecycle -------------------------------------------------

    /// Replace the current image.
    ///
    /// On success the preview, error and crop state are cleared and the
    /// view returns to its initial zoom. On failure only the error message
    /// changes.
    pub fn load_image(
        &mut self,
        bytes: Vec<u8>,
        file_name: Option<&str>,
    ) -> Result<ImageDimensions, DecodeError> {
        let dimensions = match probe_dimensions(&bytes) {
            Ok(dims) => dims,
            Err(e) => {
                log::warn!("Rejected upload {:?}: {}", file_name, e);
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        log::info!(
            "Loaded {:?} ({}x{})",
            file_name,
            dimensions.width,
            dimensions.height
        );
        self.image = Some(LoadedImage {
            bytes: bytes.into(),
            file_name: file_name.map(String::from),
            dimensions,
        });
        self.clear_workspace();
        Ok(dimensions)
    }

    /// Drop the image, preview and error ("upload new").
    pub fn reset(&mut self) {
        self.image = None;
        self.clear_workspace();
    }

    fn clear_workspace(&mut self) {
        self.display = None;
        self.crop = None;
        self.completed = None;
        self.aspect = AspectPreset::Free;
        self.view = ViewState::default();
        self.pan_anchor = None;
        self.preview = None;
        self.error = None;
    }

    /// The image element has been laid out at `size` display units.
    ///
    /// Resets the crop to the whole image and unlocks the aspect.
    pub fn set_display_size(&mut self, size: Size) -> Result<Rect, ReframeError> {
        let image = self.image.as_ref().ok_or(ReframeError::NoImage)?;
        if !size.is_valid() {
            return Err(ReframeError::NotLaidOut);
        }

        let frame = CropFrame::new(size, image.dimensions).with_padding(self.config.padding);
        let rect = frame.full_image();
        self.display = Some(size);
        self.aspect = AspectPreset::Free;
        self.commit(rect);
        Ok(rect)
    }

    /// Geometry frame for the current image, once it has been laid out.
    pub fn frame(&self) -> Option<CropFrame> {
        let image = self.image.as_ref()?;
        let display = self.display?;
        Some(CropFrame::new(display, image.dimensions).with_padding(self.config.padding))
    }

    // --- crop editing ----------------------------------------------------

    /// Choose an aspect preset.
    ///
    /// `Free` only unlocks the aspect; fixed presets recentre the crop.
    pub fn set_aspect(&mut self, preset: AspectPreset) -> Option<Rect> {
        self.aspect = preset;
        let Some(ratio) = preset.ratio() else {
            return self.crop;
        };

        let rect = self.frame()?.centered_aspect(Some(ratio));
        self.commit(rect);
        Some(rect)
    }

    /// Live update while dragging. Snaps when the precision modifier is held.
    pub fn update_crop(&mut self, next: Rect) -> Rect {
        let rect = match (self.precision, self.frame(), self.crop) {
            (true, Some(frame), Some(prev)) => {
                let mode = SnapMode::classify(&prev, &next, self.aspect.ratio().is_some());
                Snapper::new(frame, self.view.zoom)
                    .with_threshold(self.config.snap_threshold_px)
                    .snap(&prev, &next, mode)
            }
            _ => next,
        };
        self.crop = Some(rect);
        rect
    }

    /// Drag finished: the live crop becomes the committed crop.
    pub fn complete_crop(&mut self) -> Option<Rect> {
        self.completed = self.crop;
        self.completed
    }

    /// Typed-in width or height, in natural pixels. Unlocks the aspect.
    pub fn set_dimension(&mut self, axis: Axis, value: u32) -> Option<Rect> {
        let frame = self.frame()?;
        let current = self.crop?;
        let rect = match axis {
            Axis::Width => frame.with_natural_width(&current, value),
            Axis::Height => frame.with_natural_height(&current, value),
        };
        self.aspect = AspectPreset::Free;
        self.commit(rect);
        Some(rect)
    }

    fn commit(&mut self, rect: Rect) {
        self.crop = Some(rect);
        self.completed = Some(rect);
    }

    // --- view ------------------------------------------------------------

    /// Apply a mouse wheel event. Returns the new zoom.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) -> f64 {
        self.view.set_zoom(self.view.zoom + delta_y * WHEEL_ZOOM_STEP);
        self.view.zoom
    }

    pub fn begin_pan(&mut self, x: f64, y: f64) {
        self.pan_anchor = Some(Point::new(x, y));
    }

    /// Pointer moved to `(x, y)`. Ignored unless a pan is in progress.
    pub fn pan_to(&mut self, x: f64, y: f64) -> Point {
        if let Some(anchor) = self.pan_anchor {
            self.view.pan_by(x - anchor.x, y - anchor.y);
            self.pan_anchor = Some(Point::new(x, y));
        }
        self.view.pan
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    /// Precision modifier (Shift) pressed or released.
    pub fn set_precision(&mut self, held: bool) {
        self.precision = held;
    }

    // --- readouts --------------------------------------------------------

    /// Committed crop in natural pixels.
    pub fn natural_crop(&self) -> Option<PixelRect> {
        Some(self.frame()?.to_natural(&self.completed?))
    }

    /// Natural width and height of the live crop, for the W/H inputs.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some(self.frame()?.natural_size(&self.crop?))
    }

    /// True when the committed crop reaches outside the image.
    pub fn needs_uncrop(&self) -> bool {
        match (self.natural_crop(), self.image.as_ref()) {
            (Some(rect), Some(image)) => {
                is_out_of_bounds(&rect, image.dimensions.width, image.dimensions.height)
            }
            _ => false,
        }
    }

    pub fn image_dimensions(&self) -> Option<ImageDimensions> {
        self.image.as_ref().map(|i| i.dimensions)
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn crop(&self) -> Option<Rect> {
        self.crop
    }

    pub fn completed_crop(&self) -> Option<Rect> {
        self.completed
    }

    pub fn aspect(&self) -> AspectPreset {
        self.aspect
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    pub fn precision(&self) -> bool {
        self.precision
    }

    pub fn config(&self) -> &ReframeConfig {
        &self.config
    }

    // --- credential ------------------------------------------------------

    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Update the API key and persist it immediately.
    pub fn set_credential(&mut self, value: &str) {
        self.credential = value.to_string();
        self.credentials.save(value);
    }

    // --- processing ------------------------------------------------------

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn preview(&self) -> Option<&CropOutcome> {
        self.preview.as_ref()
    }

    /// Leave the preview and return to editing.
    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    /// Mark the start of a crop: sets the processing flag, clears the error.
    pub fn begin_processing(&mut self) {
        self.processing = true;
        self.error = None;
    }

    /// Snapshot the committed crop for [`CropRequest::run`].
    ///
    /// Calls [`CropSession::begin_processing`]. A failure here still needs
    /// to be passed to [`CropSession::finish_processing`].
    pub fn prepare_crop(&mut self) -> Result<CropRequest, ReframeError> {
        self.begin_processing();
        let image = self.image.as_ref().ok_or(ReframeError::NoImage)?;
        let rect = self.natural_crop().ok_or(ReframeError::NotLaidOut)?;
        Ok(CropRequest {
            source: Rc::clone(&image.bytes),
            rect,
            credential: self.credential.clone(),
            config: self.config.clone(),
        })
    }

    /// Record the result of a crop and clear the processing flag.
    ///
    /// Errors become the banner message; success becomes the preview.
    pub fn finish_processing(
        &mut self,
        result: Result<CropOutcome, ReframeError>,
    ) -> Result<&CropOutcome, ReframeError> {
        let outcome = self.settle(result)?;
        let preview: &CropOutcome = self.preview.insert(outcome);
        Ok(preview)
    }

    fn settle<T>(&mut self, result: Result<T, ReframeError>) -> Result<T, ReframeError> {
        self.processing = false;
        if let Err(e) = &result {
            log::warn!("Crop failed: {}", e);
            self.error = Some(e.to_string());
        }
        result
    }

    /// Crop (extending through `outpainter` when needed) and store the preview.
    pub async fn generate_crop<O: Outpainter>(
        &mut self,
        outpainter: &O,
    ) -> Result<&CropOutcome, ReframeError> {
        let result = match self.prepare_crop() {
            Ok(request) => request.run(outpainter).await,
            Err(e) => Err(e),
        };
        self.finish_processing(result)
    }

    /// The current preview as a download, if there is one.
    pub fn preview_download(&self) -> Option<Download> {
        self.preview.as_ref().map(|p| Download {
            file_name: self.download_name(),
            bytes: p.jpeg.clone(),
        })
    }

    /// Download the preview if there is one, otherwise crop afresh.
    ///
    /// A fresh crop does not become the preview.
    pub async fn download<O: Outpainter>(&mut self, outpainter: &O) -> Result<Download, ReframeError> {
        if let Some(download) = self.preview_download() {
            return Ok(download);
        }

        let result = match self.prepare_crop() {
            Ok(request) => request.run(outpainter).await,
            Err(e) => Err(e),
        };
        self.finish_download(result)
    }

    /// Record the result of a download crop without touching the preview.
    pub fn finish_download(
        &mut self,
        result: Result<CropOutcome, ReframeError>,
    ) -> Result<Download, ReframeError> {
        let outcome = self.settle(result)?;
        Ok(Download {
            file_name: self.download_name(),
            bytes: outcome.jpeg,
        })
    }

    /// Output file name for the current image.
    pub fn download_name(&self) -> String {
        output_file_name(self.image.as_ref().and_then(|i| i.file_name.as_deref()))
    }
}
