//! # pdf2blocks
//!
//! Turns PDF documents into an ordered, typed list of blocks (headings,
//! paragraphs, list items, images, tables, page dividers) ready to be
//! inserted into a block-based document editor.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf2blocks::{BlockExtractor, CommandLayoutEngine, ExtractOptions, PopplerRasterizer};
//!
//! fn main() -> pdf2blocks::Result<()> {
//!     let engine = CommandLayoutEngine::from_command_line("layout-dump --json")?;
//!     let extractor = BlockExtractor::new(engine, PopplerRasterizer::new())
//!         .with_options(ExtractOptions::new().with_upload_dir("/app/uploads"));
//!
//!     let result = extractor.process("paper.pdf")?;
//!     for block in &result.blocks {
//!         println!("{} p{}: {}", block.block_type, block.page, block.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Layout analysis**: an external engine labels regions of each page
//! - **Normalization**: whitespace cleanup, page dividers, provisional types
//! - **Visual ordering**: top-to-bottom, left-to-right per page
//! - **Cropping**: images and tables rasterized at 300 DPI, artifacts rejected
//! - **Overlap filtering**: text duplicated inside figures is dropped
//! - **Classification**: headings with levels, bullet and numbered list items

pub mod backend;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod model;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use backend::{
    CommandLayoutEngine, CropStore, LayoutEngine, PageRasterizer, PopplerRasterizer,
    RasterDocument, StaticLayoutEngine, StoredCrop,
};
pub use detect::{is_pdf, sniff_pdf, PdfHeader};
pub use error::{Error, Result};
pub use model::{BBox, BlockType, Element, LayoutAnalysis, LayoutItem, ProcessResult, Props};
pub use pipeline::{BlockExtractor, ExtractOptions};
pub use render::{to_json, to_markdown, JsonFormat};

use std::path::Path;

/// Process a PDF with an external layout command and poppler cropping.
///
/// Creates a fresh engine for this call. Long-running services should keep
/// one [`BlockExtractor`] instead.
///
/// # Example
///
/// ```no_run
/// use pdf2blocks::{process_file, ExtractOptions};
///
/// let result = process_file("paper.pdf", "layout-dump --json", ExtractOptions::default())?;
/// println!("{} blocks", result.blocks.len());
/// # Ok::<(), pdf2blocks::Error>(())
/// ```
pub fn process_file<P: AsRef<Path>>(
    path: P,
    layout_command: &str,
    options: ExtractOptions,
) -> Result<ProcessResult> {
    let engine = CommandLayoutEngine::from_command_line(layout_command)?;
    BlockExtractor::new(engine, PopplerRasterizer::new())
        .with_options(options)
        .process(path)
}

/// Process a PDF using precomputed layout JSON.
///
/// # Example
///
/// ```no_run
/// use pdf2blocks::{process_with_layout_file, ExtractOptions};
///
/// let options = ExtractOptions::default();
/// let result = process_with_layout_file("paper.pdf", "paper.layout.json", options)?;
/// # Ok::<(), pdf2blocks::Error>(())
/// ```
pub fn process_with_layout_file<P: AsRef<Path>, L: AsRef<Path>>(
    path: P,
    layout_json: L,
    options: ExtractOptions,
) -> Result<ProcessResult> {
    let engine = StaticLayoutEngine::from_file(layout_json)?;
    BlockExtractor::new(engine, PopplerRasterizer::new())
        .with_options(options)
        .process(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_file_empty_command() {
        let result = process_file("paper.pdf", "", ExtractOptions::default());
        assert!(matches!(result, Err(Error::LayoutEngine(_))));
    }

    #[test]
    fn test_process_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("fake.pdf");
        let layout = dir.path().join("fake.json");
        std::fs::write(&pdf, b"<html></html>").unwrap();
        std::fs::write(&layout, b"[]").unwrap();

        let result = process_with_layout_file(&pdf, &layout, ExtractOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_process_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let layout = dir.path().join("layout.json");
        std::fs::write(&layout, b"[]").unwrap();

        let result = process_with_layout_file(
            dir.path().join("missing.pdf"),
            &layout,
            ExtractOptions::default(),
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_extractor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BlockExtractor>();
    }
}
