//! Core types for crop geometry.

use serde::{Deserialize, Serialize};

/// A rectangle in a continuous coordinate space (percent or display pixels).
///
/// `x` and `y` may be negative and the rectangle may extend past the image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A rectangle in natural image pixel space.
///
/// The origin may be negative (the selection starts left of or above the
/// image); the size is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`), exclusive. Saturates at `i64::MAX`.
    #[inline]
    pub fn right(&self) -> i64 {
        self.x.saturating_add(i64::from(self.width))
    }

    /// Bottom edge (`y + height`), exclusive. Saturates at `i64::MAX`.
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(i64::from(self.height))
    }

    /// Check if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<PixelRect> for Rect {
    fn from(r: PixelRect) -> Self {
        Rect::new(r.x as f64, r.y as f64, r.width as f64, r.height as f64)
    }
}

/// Natural pixel size of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if a pixel rectangle lies fully inside these dimensions.
    pub fn contains(&self, rect: &PixelRect) -> bool {
        rect.x >= 0
            && rect.y >= 0
            && rect.right() <= i64::from(self.width)
            && rect.bottom() <= i64::from(self.height)
    }
}

/// Layout size of the image element, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A 2D offset in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Minimum zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom applied when an image is first shown.
pub const INITIAL_ZOOM: f64 = 0.8;

/// Zoom and pan of the crop workspace.
///
/// Display convenience only: natural-pixel results never depend on it, but
/// the snap threshold scales with `zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: INITIAL_ZOOM,
            pan: Point::default(),
        }
    }
}

impl ViewState {
    /// Set zoom, clamped to [`MIN_ZOOM`, `MAX_ZOOM`]. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Translate the pan offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_rect_edges() {
        let r = PixelRect::new(-50, 10, 200, 100);
        assert_eq!(r.right(), 150);
        assert_eq!(r.bottom(), 110);
        assert!(!r.is_empty());
        assert!(PixelRect::new(0, 0, 0, 10).is_empty());
    }

    #[test]
    fn test_pixel_rect_edges_saturate() {
        let r = PixelRect::new(i64::MAX, i64::MAX - 1, 20, 5);
        assert_eq!(r.right(), i64::MAX);
        assert_eq!(r.bottom(), i64::MAX);
    }

    #[test]
    fn test_dimensions_contains() {
        let dims = ImageDimensions::new(1000, 800);
        assert!(dims.contains(&PixelRect::new(0, 0, 1000, 800)));
        assert!(dims.contains(&PixelRect::new(100, 100, 200, 200)));
        assert!(!dims.contains(&PixelRect::new(-1, 0, 10, 10)));
        assert!(!dims.contains(&PixelRect::new(900, 700, 200, 200)));
    }

    #[test]
    fn test_size_validity() {
        assert!(Size::new(500.0, 300.0).is_valid());
        assert!(!Size::new(0.0, 300.0).is_valid());
        assert!(!Size::new(f64::NAN, 300.0).is_valid());
    }

    #[test]
    fn test_view_state_zoom_clamped() {
        let mut view = ViewState::default();
        assert_eq!(view.zoom, INITIAL_ZOOM);

        view.set_zoom(10.0);
        assert_eq!(view.zoom, MAX_ZOOM);

        view.set_zoom(0.0);
        assert_eq!(view.zoom, MIN_ZOOM);

        view.set_zoom(f64::NAN);
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_view_state_pan() {
        let mut view = ViewState::default();
        view.pan_by(10.0, -5.0);
        view.pan_by(2.5, 1.0);
        assert_eq!(view.pan, Point::new(12.5, -4.0));
    }

    #[test]
    fn test_rect_from_pixel_rect() {
        let r: Rect = PixelRect::new(-3, 4, 5, 6).into();
        assert_eq!(r, Rect::new(-3.0, 4.0, 5.0, 6.0));
        assert_eq!(r.right(), 2.0);
        assert_eq!(r.bottom(), 10.0);
    }
}
