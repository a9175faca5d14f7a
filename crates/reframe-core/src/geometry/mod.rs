//! Crop geometry: coordinate spaces, conversions and edge snapping.
//!
//! Three coordinate spaces are involved:
//!
//! - **Padded percent space**: what the crop widget reports. Percentages of a
//!   container that adds a fixed padding around the displayed image so handles
//!   can be dragged past the image edges.
//! - **Display space**: layout units of the image element.
//! - **Natural pixel space**: the image's intrinsic resolution. Everything
//!   downstream (bounds checks, outpainting, extraction) works here, on
//!   integer rectangles.
//!
//! All functions in this module are pure.

mod frame;
mod snap;
mod types;

pub use frame::{CropFrame, ImageEdges, DEFAULT_PADDING};
pub use snap::{snap_crop, SnapMode, Snapper, SNAP_THRESHOLD_PX};
pub use types::{
    ImageDimensions, PixelRect, Point, Rect, Size, ViewState, INITIAL_ZOOM, MAX_ZOOM, MIN_ZOOM,
};

use serde::{Deserialize, Serialize};

/// Aspect ratio presets offered by the crop toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectPreset {
    #[default]
    Free,
    Square,
    FiveFour,
    FourThree,
    SixteenNine,
    NineSixteen,
}

impl AspectPreset {
    pub const ALL: [AspectPreset; 6] = [
        AspectPreset::Free,
        AspectPreset::Square,
        AspectPreset::FiveFour,
        AspectPreset::FourThree,
        AspectPreset::SixteenNine,
        AspectPreset::NineSixteen,
    ];

    /// Width / height, or `None` for a free crop.
    pub fn ratio(self) -> Option<f64> {
        match self {
            AspectPreset::Free => None,
            AspectPreset::Square => Some(1.0),
            AspectPreset::FiveFour => Some(5.0 / 4.0),
            AspectPreset::FourThree => Some(4.0 / 3.0),
            AspectPreset::SixteenNine => Some(16.0 / 9.0),
            AspectPreset::NineSixteen => Some(9.0 / 16.0),
        }
    }

    /// Toolbar label.
    pub fn label(self) -> &'static str {
        match self {
            AspectPreset::Free => "Free",
            AspectPreset::Square => "1:1",
            AspectPreset::FiveFour => "5:4",
            AspectPreset::FourThree => "4:3",
            AspectPreset::SixteenNine => "16:9",
            AspectPreset::NineSixteen => "9:16",
        }
    }

    /// Parse a toolbar label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}
