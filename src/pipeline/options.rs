//! Extraction options and configuration.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::geometry::DEFAULT_OVERLAP_THRESHOLD;

/// Native PDF resolution: one point is 1/72 inch.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Options controlling cropping and filtering.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory crops are written to
    pub upload_dir: PathBuf,

    /// Prefix of the storage reference stored in `image_path`
    pub url_prefix: String,

    /// Share of a text box that must be covered by an image/table to drop it
    pub overlap_threshold: f32,

    /// Minimum crop width and height in points
    pub min_region_size: f32,

    /// Accepted width/height ratios for crops
    pub aspect_ratio_range: RangeInclusive<f32>,

    /// Render resolution for crops
    pub render_dpi: f32,

    /// Whether image/table regions rejected as artifacts still suppress
    /// overlapping text
    pub suppress_with_rejected_regions: bool,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the crop output directory.
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Set the storage reference prefix (e.g. "/uploads").
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// Set the overlap threshold.
    pub fn with_overlap_threshold(mut self, threshold: f32) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    /// Set the minimum crop edge length in points.
    pub fn with_min_region_size(mut self, points: f32) -> Self {
        self.min_region_size = points;
        self
    }

    /// Set the accepted aspect ratio range.
    pub fn with_aspect_ratio_range(mut self, range: RangeInclusive<f32>) -> Self {
        self.aspect_ratio_range = range;
        self
    }

    /// Set the render resolution.
    pub fn with_render_dpi(mut self, dpi: f32) -> Self {
        self.render_dpi = dpi;
        self
    }

    /// Only let successfully cropped regions suppress overlapping text.
    pub fn cropped_regions_only(mut self) -> Self {
        self.suppress_with_rejected_regions = false;
        self
    }

    /// Zoom factor from points to pixels.
    pub fn render_scale(&self) -> f32 {
        self.render_dpi / PDF_POINTS_PER_INCH
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            url_prefix: "/uploads".to_string(),
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            min_region_size: 50.0,
            aspect_ratio_range: 0.03..=30.0,
            render_dpi: 300.0,
            suppress_with_rejected_regions: true,
        }
    }
}
