//! Dataset conversion configuration types

/// Compression used when a packed asset is written as TIFF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression, fast level
    Deflate,
}

/// Configuration for converting one capture folder
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// VisualSFM camera file inside the input folder
    pub camera_file_name: String,
    pub mask_dir_name: String,
    pub normal_dir_name: String,
    /// Optional; a white albedo is synthesized when the folder is absent
    pub albedo_dir_name: String,
    /// Optional; the mask folder is used when absent
    pub mask_certainty_name: String,
    /// 8-bit masks are foreground strictly above this value
    pub threshold_8bit: u8,
    /// Masks of any other depth are foreground strictly above this value
    pub threshold_16bit: u16,
    pub aabb_scale: f64,
    pub scale: f64,
    pub offset: [f64; 3],
    pub from_na: bool,
    /// Only applies to outputs named `*.tif` / `*.tiff`
    pub tiff_compression: TiffCompression,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            camera_file_name: "cameras_v2.txt".to_string(),
            mask_dir_name: "mask".to_string(),
            normal_dir_name: "normal".to_string(),
            albedo_dir_name: "albedo".to_string(),
            mask_certainty_name: "mask_normal_uncertainty".to_string(),
            threshold_8bit: 125,
            threshold_16bit: 30000,
            aabb_scale: 1.0,
            scale: 0.5,
            offset: [0.5, 0.5, 0.5],
            from_na: true,
            tiff_compression: TiffCompression::None,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    camera_file_name: Option<String>,
    mask_certainty_name: Option<String>,
    threshold_8bit: Option<u8>,
    threshold_16bit: Option<u16>,
    aabb_scale: Option<f64>,
    scale: Option<f64>,
    offset: Option<[f64; 3]>,
    tiff_compression: Option<TiffCompression>,
}

impl ConversionConfigBuilder {
    pub fn camera_file_name(mut self, name: impl Into<String>) -> Self {
        self.camera_file_name = Some(name.into());
        self
    }

    pub fn mask_certainty_name(mut self, name: impl Into<String>) -> Self {
        self.mask_certainty_name = Some(name.into());
        self
    }

    pub fn threshold_8bit(mut self, threshold: u8) -> Self {
        self.threshold_8bit = Some(threshold);
        self
    }

    pub fn threshold_16bit(mut self, threshold: u16) -> Self {
        self.threshold_16bit = Some(threshold);
        self
    }

    pub fn aabb_scale(mut self, aabb_scale: f64) -> Self {
        self.aabb_scale = Some(aabb_scale);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn offset(mut self, offset: [f64; 3]) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            camera_file_name: self.camera_file_name.unwrap_or(default.camera_file_name),
            mask_certainty_name: self.mask_certainty_name.unwrap_or(default.mask_certainty_name),
            threshold_8bit: self.threshold_8bit.unwrap_or(default.threshold_8bit),
            threshold_16bit: self.threshold_16bit.unwrap_or(default.threshold_16bit),
            aabb_scale: self.aabb_scale.unwrap_or(default.aabb_scale),
            scale: self.scale.unwrap_or(default.scale),
            offset: self.offset.unwrap_or(default.offset),
            tiff_compression: self.tiff_compression.unwrap_or(default.tiff_compression),
            ..default
        }
    }
}
