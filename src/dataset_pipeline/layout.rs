//! Input folder discovery
//!
//! Views are paired across the mask, confidence, normal and albedo folders
//! by position in their sorted listings, not by file name. All listings are
//! taken once, up front, and must have the same length.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::dataset_pipeline::common::error::{ConversionError, Result};
use crate::dataset_pipeline::config::ConversionConfig;

/// Sorted image file names of one folder
#[derive(Debug, Clone, PartialEq)]
pub struct AssetListing {
    pub dir: PathBuf,
    pub files: Vec<String>,
}

impl AssetListing {
    /// Lists regular files with a known image extension, sorted by name.
    ///
    /// Every extension the `image` crate recognizes counts, in every folder.
    /// The mask listing is therefore not limited to `*.png`: a stray `.jpg`
    /// in `mask/` is a view and takes part in the camera count check.
    pub fn read(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ConversionError::MissingPath(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if image::ImageFormat::from_path(&path).is_err() {
                continue;
            }
            let name = entry.file_name().into_string().map_err(|name| {
                ConversionError::UnsupportedFormat(format!(
                    "non UTF-8 file name {:?} in {}",
                    name,
                    dir.display()
                ))
            })?;
            files.push(name);
        }
        files.sort();

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn path(&self, index: usize) -> PathBuf {
        self.dir.join(&self.files[index])
    }
}

/// Paths of one view, resolved by listing position
#[derive(Debug, Clone, PartialEq)]
pub struct ViewAssets {
    pub index: usize,
    pub mask: PathBuf,
    pub mask_certainty: PathBuf,
    pub normal: PathBuf,
    /// `None` when the albedo has to be synthesized
    pub albedo: Option<PathBuf>,
    pub normal_name: String,
    pub albedo_name: String,
}

#[derive(Debug, Clone)]
pub struct DatasetLayout {
    pub camera_file: PathBuf,
    pub masks: AssetListing,
    pub mask_certainty: AssetListing,
    pub normals: AssetListing,
    /// `None` when the capture has no albedo folder
    pub albedos: Option<AssetListing>,
}

impl DatasetLayout {
    #[instrument(skip(input, config), fields(input = %input.display()))]
    pub fn discover(input: &Path, config: &ConversionConfig) -> Result<Self> {
        if !input.is_dir() {
            return Err(ConversionError::MissingPath(input.to_path_buf()));
        }

        let masks = AssetListing::read(&input.join(&config.mask_dir_name))?;
        let normals = AssetListing::read(&input.join(&config.normal_dir_name))?;

        let certainty_dir = input.join(&config.mask_certainty_name);
        let mask_certainty = if certainty_dir.is_dir() {
            AssetListing::read(&certainty_dir)?
        } else {
            info!(dir = %certainty_dir.display(), "No mask confidence folder, using masks");
            masks.clone()
        };

        let albedo_dir = input.join(&config.albedo_dir_name);
        let albedos = if albedo_dir.is_dir() {
            Some(AssetListing::read(&albedo_dir)?)
        } else {
            info!(dir = %albedo_dir.display(), "No albedo folder, albedo will be white");
            None
        };

        Ok(Self {
            camera_file: input.join(&config.camera_file_name),
            masks,
            mask_certainty,
            normals,
            albedos,
        })
    }

    /// Number of views, defined by the mask folder.
    pub fn view_count(&self) -> usize {
        self.masks.len()
    }

    pub fn has_albedo(&self) -> bool {
        self.albedos.is_some()
    }

    /// Fails on the first folder whose listing length differs from the masks.
    pub fn validate(&self) -> Result<()> {
        let expected = self.view_count();
        let mut listings = vec![&self.normals, &self.mask_certainty];
        if let Some(albedos) = &self.albedos {
            listings.push(albedos);
        }

        for listing in listings {
            if listing.len() != expected {
                return Err(ConversionError::ListingMismatch {
                    directory: listing.dir.clone(),
                    expected,
                    found: listing.len(),
                });
            }
        }
        Ok(())
    }

    /// Per-view paths; call [`validate`](Self::validate) first.
    pub fn views(&self) -> impl Iterator<Item = ViewAssets> + '_ {
        (0..self.view_count()).map(move |index| {
            let albedo_listing = self.albedos.as_ref().unwrap_or(&self.normals);
            ViewAssets {
                index,
                mask: self.masks.path(index),
                mask_certainty: self.mask_certainty.path(index),
                normal: self.normals.path(index),
                albedo: self.albedos.as_ref().map(|a| a.path(index)),
                normal_name: self.normals.files[index].clone(),
                albedo_name: albedo_listing.files[index].clone(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, names: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn listings_are_sorted_and_filtered() {
        let root = tempfile::tempdir().unwrap();
        let mask = root.path().join("mask");
        touch(&mask, &["b.png", "a.png", "notes.txt", "c.PNG"]);
        fs::create_dir(mask.join("nested.png")).unwrap();

        let listing = AssetListing::read(&mask).unwrap();
        assert_eq!(listing.files, vec!["a.png", "b.png", "c.PNG"]);
        assert_eq!(listing.path(1), mask.join("b.png"));
    }

    #[test]
    fn mask_count_includes_non_png_images() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("mask"), &["0.png", "1.jpg", "2.tif"]);
        touch(&root.path().join("normal"), &["0.png", "1.png", "2.png"]);

        let layout = DatasetLayout::discover(root.path(), &ConversionConfig::default()).unwrap();
        assert_eq!(layout.view_count(), 3);
        assert_eq!(layout.masks.files, vec!["0.png", "1.jpg", "2.tif"]);
    }

    #[test]
    fn optional_folders_fall_back() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("mask"), &["m0.png", "m1.png"]);
        touch(&root.path().join("normal"), &["n0.png", "n1.png"]);

        let layout = DatasetLayout::discover(root.path(), &ConversionConfig::default()).unwrap();
        layout.validate().unwrap();
        assert!(!layout.has_albedo());
        assert_eq!(layout.mask_certainty, layout.masks);

        let views: Vec<_> = layout.views().collect();
        assert_eq!(views.len(), 2);
        assert_eq!(views[1].albedo, None);
        assert_eq!(views[1].albedo_name, "n1.png");
        assert_eq!(views[1].mask_certainty, root.path().join("mask").join("m1.png"));
    }

    #[test]
    fn pairs_by_position_not_name() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("mask"), &["0.png", "1.png"]);
        touch(&root.path().join("normal"), &["x.png", "y.png"]);
        touch(&root.path().join("albedo"), &["q.png", "p.png"]);

        let layout = DatasetLayout::discover(root.path(), &ConversionConfig::default()).unwrap();
        let first = layout.views().next().unwrap();
        assert_eq!(first.normal_name, "x.png");
        assert_eq!(first.albedo_name, "p.png");
        assert_eq!(first.albedo, Some(root.path().join("albedo").join("p.png")));
    }

    #[test]
    fn diverging_listing_is_named() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("mask"), &["0.png", "1.png"]);
        touch(&root.path().join("normal"), &["0.png", "1.png"]);
        touch(&root.path().join("albedo"), &["0.png"]);

        let layout = DatasetLayout::discover(root.path(), &ConversionConfig::default()).unwrap();
        match layout.validate().unwrap_err() {
            ConversionError::ListingMismatch { directory, expected, found } => {
                assert_eq!(directory, root.path().join("albedo"));
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn missing_normal_folder_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("mask"), &["0.png"]);
        let err = DatasetLayout::discover(root.path(), &ConversionConfig::default()).unwrap_err();
        assert!(matches!(err, ConversionError::MissingPath(p) if p.ends_with("normal")));
    }
}
