//! Collaborator capabilities used by the pipeline.
//!
//! The layout engine and the page rasterizer are injected behind traits so
//! that geometry and classification can be exercised with synthetic
//! fixtures. Concrete implementations shell out to external tools, keeping
//! the heavy models and renderers out of this crate.

mod command;
mod poppler;
mod store;

pub use command::{CommandLayoutEngine, StaticLayoutEngine};
pub use poppler::PopplerRasterizer;
pub use store::{CropStore, StoredCrop};

use std::path::Path;

use image::DynamicImage;

use crate::error::Result;
use crate::geometry::RasterRect;
use crate::model::LayoutAnalysis;

/// Layout analysis engine.
///
/// `analyze` takes `&mut self`: an engine instance is not safe to share
/// between concurrent analyses, so callers hold it exclusively.
pub trait LayoutEngine: Send {
    /// Short name for log messages.
    fn name(&self) -> &str;

    /// Analyze the document at `path`.
    fn analyze(&mut self, path: &Path) -> Result<LayoutAnalysis>;
}

/// Opens documents for region rendering.
pub trait PageRasterizer: Send + Sync {
    /// Open the document at `path`. The handle is released when dropped.
    fn open(&self, path: &Path) -> Result<Box<dyn RasterDocument>>;
}

/// An open document that can render page regions.
pub trait RasterDocument {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Page size in points as (width, height), 1-indexed page.
    fn page_dimensions(&self, page: u32) -> Result<(f32, f32)>;

    /// Lower-left corner of the page box in document space.
    fn page_origin(&self, page: u32) -> Result<(f32, f32)> {
        self.page_dimensions(page).map(|_| (0.0, 0.0))
    }

    /// Render `rect` (raster space of the unrotated page, points) of `page`
    /// at `scale` pixels per point.
    fn render(&self, page: u32, rect: &RasterRect, scale: f32) -> Result<DynamicImage>;
}
