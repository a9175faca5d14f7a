//! Edge snapping for interactive crop moves and resizes.
//!
//! While the precision modifier is held, crop edges that come within a small
//! on-screen distance of an image edge are pulled onto it. The distance is a
//! constant number of screen pixels, so its percent equivalent shrinks as the
//! user zooms in.
//!
//! | Mode                | Snaps                                       |
//! |---------------------|---------------------------------------------|
//! | `Move`              | whole box, size preserved                   |
//! | `ResizeFree`        | each moved edge independently               |
//! | `ResizeConstrained` | never (aspect-locked resize)                |

use serde::{Deserialize, Serialize};

use super::frame::CropFrame;
use super::types::{Rect, MIN_ZOOM};

/// On-screen snap distance in logical pixels.
pub const SNAP_THRESHOLD_PX: f64 = 15.0;

/// Percent change below which a size or edge counts as unchanged.
const CHANGE_EPSILON: f64 = 0.01;

/// What kind of interaction produced a new crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapMode {
    /// Translated, size unchanged.
    Move,
    /// Resized with no aspect ratio lock.
    ResizeFree,
    /// Resized with a fixed aspect ratio.
    ResizeConstrained,
}

impl SnapMode {
    /// Classify the change from `prev` to `next`.
    pub fn classify(prev: &Rect, next: &Rect, aspect_locked: bool) -> Self {
        let same_size = (next.width - prev.width).abs() < CHANGE_EPSILON
            && (next.height - prev.height).abs() < CHANGE_EPSILON;

        match (same_size, aspect_locked) {
            (true, _) => SnapMode::Move,
            (false, false) => SnapMode::ResizeFree,
            (false, true) => SnapMode::ResizeConstrained,
        }
    }
}

/// Snap settings for one frame at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapper {
    frame: CropFrame,
    zoom: f64,
    threshold_px: f64,
}

impl Snapper {
    pub fn new(frame: CropFrame, zoom: f64) -> Self {
        Self {
            frame,
            zoom: if zoom.is_finite() { zoom.max(MIN_ZOOM) } else { 1.0 },
            threshold_px: SNAP_THRESHOLD_PX,
        }
    }

    /// Override the on-screen snap distance.
    pub fn with_threshold(mut self, threshold_px: f64) -> Self {
        self.threshold_px = threshold_px;
        self
    }

    /// Snap distance in percent, `(horizontal, vertical)`.
    pub fn threshold(&self) -> (f64, f64) {
        (
            self.threshold_px / (self.frame.total_width() * self.zoom) * 100.0,
            self.threshold_px / (self.frame.total_height() * self.zoom) * 100.0,
        )
    }

    /// Snap `next` against the image edges.
    ///
    /// `prev` is the rectangle from the previous interaction event; resize
    /// snapping only touches edges that moved since then.
    pub fn snap(&self, prev: &Rect, next: &Rect, mode: SnapMode) -> Rect {
        let edges = self.frame.image_edges();
        let (tx, ty) = self.threshold();
        let near = |a: f64, b: f64, t: f64| (a - b).abs() < t;
        let moved = |a: f64, b: f64| (a - b).abs() > CHANGE_EPSILON;

        let mut snapped = *next;

        match mode {
            SnapMode::Move => {
                if near(next.x, edges.left, tx) {
                    snapped.x = edges.left;
                } else if near(next.right(), edges.right, tx) {
                    snapped.x = edges.right - next.width;
                }

                if near(next.y, edges.top, ty) {
                    snapped.y = edges.top;
                } else if near(next.bottom(), edges.bottom, ty) {
                    snapped.y = edges.bottom - next.height;
                }
            }
            SnapMode::ResizeFree => {
                if near(next.x, edges.left, tx) && moved(next.x, prev.x) {
                    snapped.width += next.x - edges.left;
                    snapped.x = edges.left;
                }
                if near(next.y, edges.top, ty) && moved(next.y, prev.y) {
                    snapped.height += next.y - edges.top;
                    snapped.y = edges.top;
                }
                if near(next.right(), edges.right, tx) && moved(next.right(), prev.right()) {
                    snapped.width = edges.right - snapped.x;
                }
                if near(next.bottom(), edges.bottom, ty) && moved(next.bottom(), prev.bottom()) {
                    snapped.height = edges.bottom - snapped.y;
                }
            }
            SnapMode::ResizeConstrained => {}
        }

        if snapped != *next {
            log::debug!("snapped crop {:?} -> {:?} ({:?})", next, snapped, mode);
        }
        snapped
    }
}

/// Classify the interaction and snap in one call.
pub fn snap_crop(
    frame: &CropFrame,
    zoom: f64,
    prev: &Rect,
    next: &Rect,
    aspect_locked: bool,
) -> Rect {
    let mode = SnapMode::classify(prev, next, aspect_locked);
    Snapper::new(*frame, zoom).snap(prev, next, mode)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
