use image::{DynamicImage, Rgb};

use crate::dataset_pipeline::assets::types::Rgb16Image;
use crate::dataset_pipeline::common::error::{ConversionError, Result};

/// Linear 8-bit to 16-bit rescale: 0 stays 0, 255 becomes 65535.
pub fn rescale_to_16bit(value: u8) -> u16 {
    u16::from(value) * 257
}

/// First three channels of a normal or albedo image, in 16-bit range.
///
/// 8-bit sources are rescaled, 16-bit sources are kept as they are. Alpha is
/// dropped. Images with fewer than three channels are rejected.
pub fn to_rgb16(name: &str, image: &DynamicImage) -> Result<Rgb16Image> {
    if image.color().channel_count() < 3 {
        return Err(ConversionError::UnsupportedFormat(format!(
            "{}: expected at least 3 channels, got {:?}",
            name,
            image.color()
        )));
    }

    let rgb = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => {
            let rgb8 = image.to_rgb8();
            let (width, height) = rgb8.dimensions();
            Rgb16Image::from_fn(width, height, |x, y| {
                let [r, g, b] = rgb8.get_pixel(x, y).0;
                Rgb([rescale_to_16bit(r), rescale_to_16bit(g), rescale_to_16bit(b)])
            })
        }
        DynamicImage::ImageRgb16(img) => img.clone(),
        other => other.to_rgb16(),
    };
    Ok(rgb)
}

/// Constant full-scale albedo used when the capture has no albedo maps.
pub fn white_albedo(width: u32, height: u32) -> Rgb16Image {
    Rgb16Image::from_pixel(width, height, Rgb([u16::MAX; 3]))
}
