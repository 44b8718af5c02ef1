use image::{DynamicImage, ImageBuffer, Luma, Pixel};

use crate::dataset_pipeline::assets::types::{BitDepth, MASK_ON, Mask16Image};

/// Per-channel depth of a decoded image.
pub fn source_bit_depth(image: &DynamicImage) -> BitDepth {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => BitDepth::Eight,
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => BitDepth::Sixteen,
        _ => BitDepth::Float,
    }
}

/// Binarizes one channel of a mask image to `{0, MASK_ON}`.
///
/// Gray masks use their luma channel. Color masks use blue, the first
/// channel in BGR storage order, so colored masks select the same plane as
/// BGR-based tooling. 8-bit sources are foreground strictly above `threshold_8bit`, everything
/// else strictly above `threshold_16bit`. Float sources are brought to the
/// 16-bit range first.
pub fn binarize_mask(image: &DynamicImage, threshold_8bit: u8, threshold_16bit: u16) -> Mask16Image {
    match image {
        DynamicImage::ImageLuma8(img) => threshold_mask_channel(img, threshold_8bit),
        DynamicImage::ImageLumaA8(img) => threshold_mask_channel(img, threshold_8bit),
        DynamicImage::ImageRgb8(img) => threshold_mask_channel(img, threshold_8bit),
        DynamicImage::ImageRgba8(img) => threshold_mask_channel(img, threshold_8bit),
        DynamicImage::ImageLuma16(img) => threshold_mask_channel(img, threshold_16bit),
        DynamicImage::ImageLumaA16(img) => threshold_mask_channel(img, threshold_16bit),
        DynamicImage::ImageRgb16(img) => threshold_mask_channel(img, threshold_16bit),
        DynamicImage::ImageRgba16(img) => threshold_mask_channel(img, threshold_16bit),
        other => threshold_mask_channel(&other.to_rgba16(), threshold_16bit),
    }
}

const BLUE: usize = 2;

fn threshold_mask_channel<P: Pixel>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    threshold: P::Subpixel,
) -> Mask16Image {
    let channel = if P::CHANNEL_COUNT >= 3 { BLUE } else { 0 };
    let (width, height) = image.dimensions();
    Mask16Image::from_fn(width, height, |x, y| {
        let value = image.get_pixel(x, y).channels()[channel];
        Luma([if value > threshold { MASK_ON } else { 0 }])
    })
}
