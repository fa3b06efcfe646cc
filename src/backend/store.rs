//! Storage for rasterized crops.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use image::{DynamicImage, ImageFormat};
use uuid::Uuid;

use crate::error::Result;

/// Reference to a saved crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCrop {
    /// Storage-relative reference, e.g. "/uploads/crop_1700000000000_<uuid>_3.png"
    pub path: String,
    /// File name inside the upload directory
    pub filename: String,
}

/// Writes crops as PNG files into an upload directory.
#[derive(Debug, Clone)]
pub struct CropStore {
    dir: PathBuf,
    url_prefix: String,
}

impl CropStore {
    /// Create a store writing to `dir`, referencing files under `url_prefix`.
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// Upload directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Save `image` under a freshly generated name.
    ///
    /// Names stay unique across concurrent runs sharing the upload directory.
    pub fn save(&self, image: &DynamicImage, index: usize) -> Result<StoredCrop> {
        let filename = format!(
            "crop_{}_{}_{}.png",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            index
        );
        image.save_with_format(self.dir.join(&filename), ImageFormat::Png)?;

        Ok(StoredCrop {
            path: format!("{}/{}", self.url_prefix.trim_end_matches('/'), filename),
            filename,
        })
    }
}
