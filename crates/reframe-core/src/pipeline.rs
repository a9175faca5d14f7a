//! Extend-or-crop orchestration.
//!
//! Given the source bytes and a natural-pixel rectangle, either crop
//! directly or grow the image through an [`Outpainter`] first:
//!
//! ```text
//! empty rect -> CropError::Empty
//! decode source -> calculate_extend
//!     None          -> extract -> encode
//!     Some(margins) -> resolve credential -> outpaint -> decode
//!                      -> verify size -> offset rect -> extract -> encode
//! ```

use serde::{Deserialize, Serialize};

use crate::bounds::{calculate_extend, ExtendMargins};
use crate::config::ReframeConfig;
use crate::decode::{decode_image, DecodedImage};
use crate::encode::encode_image;
use crate::error::ReframeError;
use crate::geometry::PixelRect;
use crate::outpaint::{resolve_credential, Outpainter};
use crate::transform::{extract_crop, CropError};

/// Result of a crop, ready for preview or download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropOutcome {
    /// JPEG bytes.
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Margins the image was extended by, if it was.
    pub margins: Option<ExtendMargins>,
}

impl CropOutcome {
    pub fn was_extended(&self) -> bool {
        self.margins.is_some()
    }
}

/// Crop `source` to `rect`, outpainting first if `rect` leaves the image.
///
/// # Arguments
///
/// * `source` - Encoded source image
/// * `rect` - Crop in the source's natural pixels; may reach outside it
/// * `outpainter` - Used only when the crop is out of bounds
/// * `credential` - The user's API key, if entered
/// * `config` - Fallback API key and JPEG quality
///
/// # Errors
///
/// An empty `rect` fails with `CropError::Empty` before anything else.
/// Credential resolution happens before any request, so a missing key
/// fails without network traffic. An outpainted image whose size differs
/// from the requested extension yields `ReframeError::UnexpectedDimensions`.
pub async fn crop_or_extend<O: Outpainter>(
    source: &[u8],
    rect: &PixelRect,
    outpainter: &O,
    credential: Option<&str>,
    config: &ReframeConfig,
) -> Result<CropOutcome, ReframeError> {
    if rect.is_empty() {
        return Err(CropError::Empty.into());
    }

    let image = decode_image(source)?;

    let Some(margins) = calculate_extend(rect, image.width, image.height) else {
        log::info!("Cropping {:?} from {}x{} image", rect, image.width, image.height);
        return finish(&image, rect, None, config.jpeg_quality);
    };

    let credential = resolve_credential(credential, config.api_key.as_deref())?;
    log::info!("Crop {:?} needs extension by {:?}", rect, margins);

    let extended_bytes = outpainter.extend(source, &margins, &credential).await?;
    let extended = decode_image(&extended_bytes)?;

    let expected = margins.extended_dimensions(image.dimensions());
    if extended.dimensions() != expected {
        log::warn!(
            "Outpaint returned {:?}, expected {:?}",
            extended.dimensions(),
            expected
        );
        return Err(ReframeError::UnexpectedDimensions {
            expected,
            actual: extended.dimensions(),
        });
    }

    finish(&extended, &margins.offset(rect), Some(margins), config.jpeg_quality)
}

fn finish(
    image: &DecodedImage,
    rect: &PixelRect,
    margins: Option<ExtendMargins>,
    quality: u8,
) -> Result<CropOutcome, ReframeError> {
    let cropped = extract_crop(image, rect)?;
    let jpeg = encode_image(&cropped, quality)?;
    Ok(CropOutcome {
        jpeg,
        width: cropped.width,
        height: cropped.height,
        margins,
    })
}
