use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

use super::{OutpaintError, Outpainter};
use crate::bounds::ExtendMargins;
use crate::decode::decode_image;

/// Offline outpainter that grows the image by repeating its edge pixels.
///
/// Honors the same size and placement contract as the remote service and
/// returns PNG bytes, so the original content survives unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddingOutpainter;

impl PaddingOutpainter {
    pub fn new() -> Self {
        Self
    }

    fn pad(image: &[u8], margins: &ExtendMargins) -> Result<Vec<u8>, OutpaintError> {
        let source = decode_image(image).map_err(|e| OutpaintError::Local(e.to_string()))?;
        if source.is_empty() {
            return Err(OutpaintError::Local("source image is empty".to_string()));
        }

        let extended = margins.extended_dimensions(source.dimensions());
        let max_x = i64::from(source.width) - 1;
        let max_y = i64::from(source.height) - 1;

        let canvas = RgbImage::from_fn(extended.width, extended.height, |x, y| {
            let sx = (i64::from(x) - i64::from(margins.left)).clamp(0, max_x) as usize;
            let sy = (i64::from(y) - i64::from(margins.up)).clamp(0, max_y) as usize;
            let idx = (sy * source.width as usize + sx) * 3;
            image::Rgb([
                source.pixels[idx],
                source.pixels[idx + 1],
                source.pixels[idx + 2],
            ])
        });

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(canvas)
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| OutpaintError::Local(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

impl Outpainter for PaddingOutpainter {
    async fn extend(
        &self,
        image: &[u8],
        margins: &ExtendMargins,
        _credential: &str,
    ) -> Result<Vec<u8>, OutpaintError> {
        log::debug!("Padding image locally by {:?}", margins);
        Self::pad(image, margins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ImageDimensions;
    use crate::test_support::{encoded_gradient, gradient_image, pixel_at};

    #[tokio::test]
    async fn test_extended_size_and_placement() {
        let bytes = encoded_gradient(20, 10, ImageFormat::Png);
        let margins = ExtendMargins::new(5, 3, 2, 4);

        let out = PaddingOutpainter::new()
            .extend(&bytes, &margins, "")
            .await
            .unwrap();
        let out = decode_image(&out).unwrap();
        let original = gradient_image(20, 10);

        assert_eq!(out.dimensions(), ImageDimensions::new(28, 16));
        assert_eq!(pixel_at(&out, 5, 2), pixel_at(&original, 0, 0));
        assert_eq!(pixel_at(&out, 24, 11), pixel_at(&original, 19, 9));
        // Margins repeat the nearest edge pixel
        assert_eq!(pixel_at(&out, 0, 0), pixel_at(&original, 0, 0));
        assert_eq!(pixel_at(&out, 27, 15), pixel_at(&original, 19, 9));
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let result = PaddingOutpainter::new()
            .extend(b"nope", &ExtendMargins::new(1, 0, 0, 0), "")
            .await;
        assert!(matches!(result, Err(OutpaintError::Local(_))));
    }
}
