//! Bounds checking and extension margins.
//!
//! A crop rectangle in natural pixels may reach past the image on any side.
//! [`calculate_extend`] measures by how much, producing the margins the
//! outpaint service needs to grow the image until the rectangle fits.
//!
//! Both functions take the integer [`PixelRect`] produced by the geometry
//! engine, so `is_out_of_bounds(r, w, h) == calculate_extend(r, w, h).is_some()`
//! holds for every input.

use serde::{Deserialize, Serialize};

use crate::geometry::{ImageDimensions, PixelRect};

/// Pixels an image must grow on each edge to contain a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExtendMargins {
    pub left: u32,
    pub right: u32,
    pub up: u32,
    pub down: u32,
}

impl ExtendMargins {
    pub fn new(left: u32, right: u32, up: u32, down: u32) -> Self {
        Self {
            left,
            right,
            up,
            down,
        }
    }

    /// True when no edge needs to grow.
    pub fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0 && self.up == 0 && self.down == 0
    }

    /// Shift a rectangle into the coordinate space of the extended image.
    ///
    /// The original content sits at `(left, up)` in the extended image, so a
    /// rectangle that started at `(-left, -up)` now starts at the origin.
    pub fn offset(&self, rect: &PixelRect) -> PixelRect {
        PixelRect {
            x: rect.x + i64::from(self.left),
            y: rect.y + i64::from(self.up),
            width: rect.width,
            height: rect.height,
        }
    }

    /// Dimensions of an image after it has been extended by these margins.
    pub fn extended_dimensions(&self, dims: ImageDimensions) -> ImageDimensions {
        ImageDimensions {
            width: dims
                .width
                .saturating_add(self.left)
                .saturating_add(self.right),
            height: dims.height.saturating_add(self.up).saturating_add(self.down),
        }
    }

    /// Multipart form fields for the uncrop request.
    ///
    /// Zero margins are omitted; values are decimal integer strings.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("extend_left", self.left),
            ("extend_right", self.right),
            ("extend_up", self.up),
            ("extend_down", self.down),
        ]
        .into_iter()
        .filter(|(_, v)| *v > 0)
        .map(|(k, v)| (k, v.to_string()))
        .collect()
    }
}

/// Compute the margins needed for `rect` to fit inside an image.
///
/// # Returns
///
/// `None` when the rectangle already lies within `image_width x image_height`
/// (an ordinary crop), otherwise the per-edge growth.
///
/// # Example
///
/// ```ignore
/// let margins = calculate_extend(&PixelRect::new(-50, 0, 200, 200), 1000, 800);
/// assert_eq!(margins, Some(ExtendMargins::new(50, 0, 0, 0)));
/// ```
pub fn calculate_extend(
    rect: &PixelRect,
    image_width: u32,
    image_height: u32,
) -> Option<ExtendMargins> {
    let margins = ExtendMargins {
        left: overshoot(rect.x.saturating_neg()),
        up: overshoot(rect.y.saturating_neg()),
        right: overshoot(rect.right().saturating_sub(i64::from(image_width))),
        down: overshoot(rect.bottom().saturating_sub(i64::from(image_height))),
    };

    if margins.is_zero() {
        None
    } else {
        Some(margins)
    }
}

/// Cheap check for whether `rect` reaches outside the image.
pub fn is_out_of_bounds(rect: &PixelRect, image_width: u32, image_height: u32) -> bool {
    rect.x < 0
        || rect.y < 0
        || rect.right() > i64::from(image_width)
        || rect.bottom() > i64::from(image_height)
}

/// Positive part of `v`, saturated to `u32`.
#[inline]
fn overshoot(v: i64) -> u32 {
    u32::try_from(v.max(0)).unwrap_or(u32::MAX)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dims_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=10000, 1u32..=10000)
    }

    fn rect_strategy() -> impl Strategy<Value = PixelRect> {
        (-5000i64..=15000, -5000i64..=15000, 0u32..=12000, 0u32..=12000)
            .prop_map(|(x, y, w, h)| PixelRect::new(x, y, w, h))
    }

    proptest! {
        /// Property: the predicate agrees with the margin calculation.
        #[test]
        fn prop_predicate_agrees_with_extend(
            rect in rect_strategy(),
            (w, h) in dims_strategy(),
        ) {
            prop_assert_eq!(
                is_out_of_bounds(&rect, w, h),
                calculate_extend(&rect, w, h).is_some()
            );
        }

        /// Property: rectangles inside the image need no extension.
        #[test]
        fn prop_inside_needs_no_extension(
            (w, h) in dims_strategy(),
            (fx, fy, fw, fh) in (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0),
        ) {
            let x = (fx * w as f64) as i64;
            let y = (fy * h as f64) as i64;
            let width = (fw * (w as i64 - x) as f64) as u32;
            let height = (fh * (h as i64 - y) as f64) as u32;
            let rect = PixelRect::new(x, y, width, height);

            prop_assert_eq!(calculate_extend(&rect, w, h), None);
            prop_assert!(!is_out_of_bounds(&rect, w, h));
        }

        /// Property: a negative x is extended by exactly -x on the left.
        #[test]
        fn prop_negative_x_extends_left(
            neg in 1i64..=5000,
            rect in rect_strategy(),
            (w, h) in dims_strategy(),
        ) {
            let rect = PixelRect { x: -neg, ..rect };
            let margins = calculate_extend(&rect, w, h).unwrap();
            prop_assert_eq!(i64::from(margins.left), neg);
            prop_assert!(margins.left > 0);
        }

        /// Property: after extension and offset the rectangle fits.
        #[test]
        fn prop_offset_rect_fits_extended_image(
            rect in rect_strategy(),
            (w, h) in dims_strategy(),
        ) {
            let dims = ImageDimensions::new(w, h);
            if let Some(margins) = calculate_extend(&rect, w, h) {
                let extended = margins.extended_dimensions(dims);
                prop_assert!(extended.contains(&margins.offset(&rect)));
            }
        }
    }
}
