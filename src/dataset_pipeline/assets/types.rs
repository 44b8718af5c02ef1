//! Packed asset types

use image::{ImageBuffer, Luma, Rgb, Rgba};

use crate::dataset_pipeline::common::error::{ConversionError, Result};

pub type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;
pub type Mask16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Value of a foreground pixel in a binarized mask.
pub const MASK_ON: u16 = u16::MAX;

/// Per-channel depth of a decoded source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Eight,
    Sixteen,
    Float,
}

/// Color image (albedo or normal) with a binary mask in its alpha channel
#[derive(Debug, Clone, PartialEq)]
pub struct PackedAsset {
    image: Rgba16Image,
}

impl PackedAsset {
    /// Concatenates `color` and `alpha` along the channel axis.
    pub fn pack(name: &str, color: &Rgb16Image, alpha: &Mask16Image) -> Result<Self> {
        let (width, height) = color.dimensions();
        if alpha.dimensions() != (width, height) {
            return Err(ConversionError::DimensionMismatch {
                name: name.to_string(),
                expected_width: width,
                expected_height: height,
                width: alpha.width(),
                height: alpha.height(),
            });
        }

        let image = Rgba16Image::from_fn(width, height, |x, y| {
            let [r, g, b] = color.get_pixel(x, y).0;
            let [a] = alpha.get_pixel(x, y).0;
            Rgba([r, g, b, a])
        });
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &Rgba16Image {
        &self.image
    }

    /// Channels `[0:3]` and `[3]` as separate images.
    pub fn split(&self) -> (Rgb16Image, Mask16Image) {
        let (width, height) = self.image.dimensions();
        let color = Rgb16Image::from_fn(width, height, |x, y| {
            let [r, g, b, _] = self.image.get_pixel(x, y).0;
            Rgb([r, g, b])
        });
        let alpha = Mask16Image::from_fn(width, height, |x, y| Luma([self.image.get_pixel(x, y).0[3]]));
        (color, alpha)
    }
}
