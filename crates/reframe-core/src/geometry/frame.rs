//! Conversions between padded percent space, display space and natural pixels.
//!
//! The crop widget lays the image out inside a container that adds `padding`
//! display units on every side, and reports the selection as percentages of
//! that padded container. Because the padding and the image are scaled by
//! the same zoom factor, percentages do not change when the user zooms.
//!
//! ```text
//!  total_width = display.width + 2 * padding
//!  +-----------------------------------------+
//!  |  padding                                |
//!  |      +-------------------------+        |
//!  |      |  image (display size)   |        |
//!  |      +-------------------------+        |
//!  |                                         |
//!  +-----------------------------------------+
//! ```

use serde::{Deserialize, Serialize};

use super::types::{ImageDimensions, PixelRect, Rect, Size};

/// Margin added around the displayed image, in display units.
pub const DEFAULT_PADDING: f64 = 1000.0;

/// Fraction of the image width used by the square crop when no aspect is set.
const FREE_CROP_FRACTION: f64 = 0.9;

/// Image edges expressed in padded percent space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageEdges {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Everything needed to map a selection between coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropFrame {
    /// Layout size of the image element.
    pub display: Size,
    /// Natural pixel size of the image.
    pub natural: ImageDimensions,
    /// Margin around the image, in display units.
    pub padding: f64,
}

impl CropFrame {
    /// Create a frame with the default padding.
    pub fn new(display: Size, natural: ImageDimensions) -> Self {
        Self {
            display,
            natural,
            padding: DEFAULT_PADDING,
        }
    }

    /// Replace the padding.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// A frame is usable when both sizes are non-zero and the padding is
    /// finite and non-negative. Conversions on an invalid frame produce
    /// meaningless (but non-panicking) values.
    pub fn is_valid(&self) -> bool {
        self.display.is_valid()
            && self.natural.width > 0
            && self.natural.height > 0
            && self.padding.is_finite()
            && self.padding >= 0.0
    }

    /// Width of the padded container.
    #[inline]
    pub fn total_width(&self) -> f64 {
        self.display.width + 2.0 * self.padding
    }

    /// Height of the padded container.
    #[inline]
    pub fn total_height(&self) -> f64 {
        self.display.height + 2.0 * self.padding
    }

    /// Natural pixels per display unit, horizontally.
    #[inline]
    pub fn scale_x(&self) -> f64 {
        self.natural.width as f64 / self.display.width
    }

    /// Natural pixels per display unit, vertically.
    #[inline]
    pub fn scale_y(&self) -> f64 {
        self.natural.height as f64 / self.display.height
    }

    /// Convert a padded-percent selection to natural image pixels.
    ///
    /// # Algorithm
    ///
    /// 1. Percent to padded display units: `p / 100 * total`
    /// 2. Remove the padding from the origin
    /// 3. Scale by `natural / display`
    /// 4. Round to the nearest integer (ties away from zero)
    ///
    /// Negative sizes clamp to zero.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let frame = CropFrame::new(Size::new(500.0, 400.0), ImageDimensions::new(1000, 800));
    /// let px = frame.to_natural(&frame.full_image());
    /// assert_eq!(px, PixelRect::new(0, 0, 1000, 800));
    /// ```
    pub fn to_natural(&self, percent: &Rect) -> PixelRect {
        let total_w = self.total_width();
        let total_h = self.total_height();
        let sx = self.scale_x();
        let sy = self.scale_y();

        let x = (percent.x / 100.0 * total_w - self.padding) * sx;
        let y = (percent.y / 100.0 * total_h - self.padding) * sy;
        let width = percent.width / 100.0 * total_w * sx;
        let height = percent.height / 100.0 * total_h * sy;

        PixelRect {
            x: round_coord(x),
            y: round_coord(y),
            width: round_len(width),
            height: round_len(height),
        }
    }

    /// Convert a natural-pixel rectangle to padded percent space.
    ///
    /// Inverse of [`CropFrame::to_natural`] up to rounding:
    /// `to_natural(to_percent(r)) == r` for every valid frame.
    pub fn to_percent(&self, rect: &PixelRect) -> Rect {
        let display = Rect::new(
            rect.x as f64 / self.scale_x(),
            rect.y as f64 / self.scale_y(),
            rect.width as f64 / self.scale_x(),
            rect.height as f64 / self.scale_y(),
        );
        self.display_to_percent(&display)
    }

    /// Convert a rectangle in image display units (origin at the image's
    /// top-left corner, padding excluded) to padded percent space.
    pub fn display_to_percent(&self, rect: &Rect) -> Rect {
        let total_w = self.total_width();
        let total_h = self.total_height();
        Rect {
            x: (rect.x + self.padding) / total_w * 100.0,
            y: (rect.y + self.padding) / total_h * 100.0,
            width: rect.width / total_w * 100.0,
            height: rect.height / total_h * 100.0,
        }
    }

    /// Natural pixel size of a percent selection, as shown in the W/H readout.
    pub fn natural_size(&self, percent: &Rect) -> (u32, u32) {
        let px = self.to_natural(percent);
        (px.width, px.height)
    }

    /// Image edges in padded percent space.
    pub fn image_edges(&self) -> ImageEdges {
        let total_w = self.total_width();
        let total_h = self.total_height();
        ImageEdges {
            left: self.padding / total_w * 100.0,
            top: self.padding / total_h * 100.0,
            right: (self.padding + self.display.width) / total_w * 100.0,
            bottom: (self.padding + self.display.height) / total_h * 100.0,
        }
    }

    /// Selection covering exactly the whole image.
    pub fn full_image(&self) -> Rect {
        self.display_to_percent(&Rect::new(
            0.0,
            0.0,
            self.display.width,
            self.display.height,
        ))
    }

    /// Largest centred selection with the given aspect ratio that fits the image.
    ///
    /// With no aspect (or a non-positive one) a square `0.9 * width` wide is
    /// used, shrunk to the image height if needed.
    pub fn centered_aspect(&self, aspect: Option<f64>) -> Rect {
        let media_w = self.display.width;
        let media_h = self.display.height;

        let (width, height) = match aspect.filter(|a| a.is_finite() && *a > 0.0) {
            Some(aspect) => {
                let mut width = media_w;
                let mut height = width / aspect;
                if height > media_h {
                    height = media_h;
                    width = height * aspect;
                }
                (width, height)
            }
            None => {
                let side = (media_w * FREE_CROP_FRACTION).min(media_h);
                (side, side)
            }
        };

        self.display_to_percent(&Rect::new(
            (media_w - width) / 2.0,
            (media_h - height) / 2.0,
            width,
            height,
        ))
    }

    /// Resize a selection so it is `width` natural pixels wide, keeping its origin.
    pub fn with_natural_width(&self, percent: &Rect, width: u32) -> Rect {
        let display_w = width as f64 / self.scale_x();
        Rect {
            width: display_w / self.total_width() * 100.0,
            ..*percent
        }
    }

    /// Resize a selection so it is `height` natural pixels tall, keeping its origin.
    pub fn with_natural_height(&self, percent: &Rect, height: u32) -> Rect {
        let display_h = height as f64 / self.scale_y();
        Rect {
            height: display_h / self.total_height() * 100.0,
            ..*percent
        }
    }
}

/// Round a coordinate to the nearest integer; NaN maps to 0.
#[inline]
fn round_coord(v: f64) -> i64 {
    v.round() as i64
}

/// Round a length to the nearest non-negative integer; NaN maps to 0.
#[inline]
fn round_len(v: f64) -> u32 {
    v.round().max(0.0) as u32
}


// ============================================================================
// Property-Based Tests
// ============================================================================
