//! Shared fixtures for unit tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::decode::DecodedImage;

/// Image where pixel `(x, y)` is `[x, y, 128]` (wrapping at 256).
pub fn gradient_image(width: u32, height: u32) -> DecodedImage {
    let img = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 128]));
    DecodedImage::from_rgb_image(img)
}

/// [`gradient_image`] encoded in `format`.
pub fn encoded_gradient(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = gradient_image(width, height);
    encode_rgb(&img, format)
}

/// Encode a decoded image in `format`.
pub fn encode_rgb(img: &DecodedImage, format: ImageFormat) -> Vec<u8> {
    let rgb = RgbImage::from_raw(img.width, img.height, img.pixels.clone()).unwrap();
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut buffer, format)
        .unwrap();
    buffer.into_inner()
}

/// RGB triple at `(x, y)`.
pub fn pixel_at(img: &DecodedImage, x: u32, y: u32) -> [u8; 3] {
    let idx = ((y * img.width + x) * 3) as usize;
    [img.pixels[idx], img.pixels[idx + 1], img.pixels[idx + 2]]
}
