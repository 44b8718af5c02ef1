use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use tempfile::TempDir;

use crate::dataset_pipeline::assets::{AssetReader, MASK_ON, PackedAsset, PackedAssetWriter};
use crate::dataset_pipeline::cameras::CAMERA_COUNT_MARKER;
use crate::dataset_pipeline::common::error::{ConversionError, Result};
use crate::dataset_pipeline::config::ConversionConfig;
use crate::dataset_pipeline::conversions::DatasetConverter;
use crate::dataset_pipeline::manifest::Manifest;

/// Serves synthetic images keyed by the folder a path lives in.
struct MockReader {
    should_fail: bool,
    mask_size: (u32, u32),
}

impl MockReader {
    fn new() -> Self {
        Self {
            should_fail: false,
            mask_size: (4, 3),
        }
    }
}

impl AssetReader for MockReader {
    fn read_image(&self, path: &Path) -> Result<DynamicImage> {
        if self.should_fail {
            return Err(ConversionError::DecodeError("Mock decode error".to_string()));
        }
        let folder = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let image = match folder {
            "mask" => DynamicImage::ImageLuma8(GrayImage::from_pixel(
                self.mask_size.0,
                self.mask_size.1,
                Luma([200]),
            )),
            "mask_normal_uncertainty" => {
                DynamicImage::ImageLuma16(ImageBuffer::from_pixel(4, 3, Luma([1000u16])))
            }
            "normal" => DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([255, 0, 128]))),
            "albedo" => DynamicImage::ImageRgb16(ImageBuffer::from_pixel(4, 3, Rgb([10u16, 20, 30]))),
            other => panic!("unexpected folder {other}"),
        };
        Ok(image)
    }
}

struct MockWriter {
    should_fail: bool,
    written: Arc<Mutex<Vec<(PathBuf, PackedAsset)>>>,
}

impl PackedAssetWriter for MockWriter {
    fn write_packed(&self, asset: &PackedAsset, path: &Path, _config: &ConversionConfig) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::EncodeError("Mock encode error".to_string()));
        }
        self.written.lock().unwrap().push((path.to_path_buf(), asset.clone()));
        Ok(())
    }
}

fn camera_file(focals: &[f64]) -> String {
    let mut text = format!("{}\n{}\n\n", CAMERA_COUNT_MARKER, focals.len());
    for (i, focal) in focals.iter().enumerate() {
        text.push_str(&format!(
            "{i:03}.png\n{i:03}.png\n{focal}\n2 1.5\n0 0 {}\n5 5 5\n0 0 0\n1 0 0 0\n1 0 0\n0 1 0\n0 0 1\n0 0\n0 0 0\n0\n\n",
            -(i as f64) - 1.0
        ));
    }
    text
}

fn touch(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), b"").unwrap();
    }
}

/// Capture folder with empty placeholder files; content comes from the mock.
fn capture(views: usize, cameras: usize, with_albedo: bool, with_certainty: bool) -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let names: Vec<String> = (0..views).map(|i| format!("{i:03}.png")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();

    touch(&root.path().join("mask"), &names);
    touch(&root.path().join("normal"), &names);
    if with_albedo {
        touch(&root.path().join("albedo"), &names);
    }
    if with_certainty {
        touch(&root.path().join("mask_normal_uncertainty"), &names);
    }

    let focals: Vec<f64> = (0..cameras).map(|i| 1000.0 + i as f64).collect();
    std::fs::write(root.path().join("cameras_v2.txt"), camera_file(&focals)).unwrap();
    root
}

fn converter(
    reader: MockReader,
    should_fail: bool,
) -> (DatasetConverter<MockReader, MockWriter>, Arc<Mutex<Vec<(PathBuf, PackedAsset)>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let writer = MockWriter {
        should_fail,
        written: written.clone(),
    };
    (
        DatasetConverter::with_custom(reader, writer, ConversionConfig::default()),
        written,
    )
}

#[test]
fn test_successful_conversion() {
    let root = capture(2, 2, true, true);
    let output = root.path().join("RNb-NeuS2");
    let (converter, written) = converter(MockReader::new(), false);

    let report = converter.convert(root.path(), &output).unwrap();

    assert_eq!(report.frames, 2);
    assert_eq!((report.width, report.height), (4, 3));
    assert_eq!(report.timings.steps().iter().filter(|s| s.name == "pack_view").count(), 2);
    assert!(output.join("albedos").is_dir());
    assert!(output.join("normals").is_dir());

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 4);
    assert_eq!(written[0].0, output.join("albedos").join("000.png"));
    assert_eq!(written[1].0, output.join("normals").join("000.png"));

    // albedo carries the confidence mask (16-bit 1000 -> background)
    let albedo = written[0].1.image();
    assert!(albedo.pixels().all(|p| p.0 == [10, 20, 30, 0]));
    // normal carries the mask (8-bit 200 -> foreground), rescaled from 8 bit
    let normal = written[1].1.image();
    assert!(normal.pixels().all(|p| p.0 == [65535, 0, 32896, MASK_ON]));

    let manifest: Manifest =
        serde_json::from_str(&std::fs::read_to_string(&report.manifest_path).unwrap()).unwrap();
    assert_eq!(manifest.frames.len(), 2);
    assert_eq!((manifest.w, manifest.h), (4, 3));
    assert_eq!(manifest.frames[1].intrinsic_matrix[0][0], 1001.0);
    assert_eq!(manifest.frames[1].intrinsic_matrix[0][2], 2.0);
    assert_eq!(manifest.frames[1].intrinsic_matrix[1][2], 1.5);
    assert_eq!(manifest.frames[1].transform_matrix[2][3], 2.0);
    assert_eq!(manifest.frames[1].albedo_path, "albedos/001.png");
    assert_eq!(manifest.frames[1].normal_path, "normals/001.png");
}

#[test]
fn test_camera_count_mismatch_writes_nothing() {
    let root = capture(2, 1, true, true);
    let output = root.path().join("out");
    let (converter, written) = converter(MockReader::new(), false);

    let err = converter.convert(root.path(), &output).unwrap_err();

    assert!(matches!(
        err,
        ConversionError::CameraCountMismatch { cameras: 1, images: 2 }
    ));
    assert!(written.lock().unwrap().is_empty());
    assert!(!output.exists());
}

#[test]
fn test_listing_mismatch_writes_nothing() {
    let root = capture(2, 2, true, true);
    std::fs::remove_file(root.path().join("albedo").join("001.png")).unwrap();
    let output = root.path().join("out");
    let (converter, written) = converter(MockReader::new(), false);

    let err = converter.convert(root.path(), &output).unwrap_err();

    assert!(matches!(err, ConversionError::ListingMismatch { expected: 2, found: 1, .. }));
    assert!(written.lock().unwrap().is_empty());
    assert!(!output.exists());
}

#[test]
fn test_missing_albedo_is_white() {
    let root = capture(1, 1, false, false);
    let output = root.path().join("out");
    let (converter, written) = converter(MockReader::new(), false);

    converter.convert(root.path(), &output).unwrap();

    let written = written.lock().unwrap();
    assert_eq!(written[0].0, output.join("albedos").join("000.png"));
    // without a confidence folder the mask doubles as confidence
    assert!(written[0].1.image().pixels().all(|p| p.0 == [65535, 65535, 65535, MASK_ON]));
}

#[test]
fn test_reader_failure() {
    let root = capture(1, 1, true, true);
    let reader = MockReader {
        should_fail: true,
        ..MockReader::new()
    };
    let (converter, _) = converter(reader, false);

    let result = converter.convert(root.path(), root.path().join("out"));

    assert!(matches!(result.unwrap_err(), ConversionError::DecodeError(_)));
}

#[test]
fn test_writer_failure() {
    let root = capture(1, 1, true, true);
    let (converter, _) = converter(MockReader::new(), true);

    let result = converter.convert(root.path(), root.path().join("out"));

    assert!(matches!(result.unwrap_err(), ConversionError::EncodeError(_)));
}

#[test]
fn test_mask_size_must_match_normal() {
    let root = capture(1, 1, true, false);
    let reader = MockReader {
        mask_size: (2, 2),
        ..MockReader::new()
    };
    let (converter, _) = converter(reader, false);

    let result = converter.convert(root.path(), root.path().join("out"));

    assert!(matches!(
        result.unwrap_err(),
        ConversionError::DimensionMismatch { width: 2, height: 2, .. }
    ));
}

#[test]
fn test_missing_camera_file() {
    let root = capture(1, 1, true, true);
    std::fs::remove_file(root.path().join("cameras_v2.txt")).unwrap();
    let (converter, _) = converter(MockReader::new(), false);

    let result = converter.convert(root.path(), root.path().join("out"));

    assert!(matches!(result.unwrap_err(), ConversionError::MissingPath(p) if p.ends_with("cameras_v2.txt")));
}

#[test]
fn test_converter_keeps_its_config() {
    let config = ConversionConfig::builder()
        .mask_certainty_name("confidence".to_string())
        .build();
    let converter = DatasetConverter::new(config);

    assert_eq!(converter.config().mask_certainty_name, "confidence");
    assert_eq!(converter.config().threshold_8bit, 125);
}
