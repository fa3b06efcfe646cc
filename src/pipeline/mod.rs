//! Document-to-blocks pipeline.
//!
//! Stages, in order: layout analysis, [`normalize`], [`sort_visual`],
//! [`crop_regions`] for images and tables, the overlap/noise filter
//! ([`check_text`]) and [`classify`].

mod classify;
mod crop;
mod filter;
mod normalize;
mod options;
mod order;

pub use classify::{
    classify, heading_level, Reclassification, Rule, CORE_KEYWORDS, CORE_KEYWORDS_KO, RULES,
};
pub use crop::{check_region, crop_regions, Rejection};
pub use filter::{check_text, RegionIndex, TextRejection};
pub use normalize::{normalize, normalize_text, provisional_type};
pub use options::{ExtractOptions, PDF_POINTS_PER_INCH};
pub use order::sort_visual;

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use crate::backend::{CropStore, LayoutEngine, PageRasterizer};
use crate::detect::sniff_pdf;
use crate::error::{Error, Result};
use crate::model::{Element, ProcessResult};

/// Turns PDFs into editor blocks.
///
/// One extractor is meant to live for the whole process. The layout engine
/// is expensive to create and not safe for concurrent analyses, so it sits
/// behind a mutex: concurrent `process` calls serialize on the analysis
/// step and run cropping and assembly in parallel.
pub struct BlockExtractor {
    engine: Mutex<Box<dyn LayoutEngine>>,
    rasterizer: Box<dyn PageRasterizer>,
    store: CropStore,
    options: ExtractOptions,
}

impl BlockExtractor {
    /// Create an extractor with default options.
    pub fn new<E, R>(engine: E, rasterizer: R) -> Self
    where
        E: LayoutEngine + 'static,
        R: PageRasterizer + 'static,
    {
        let options = ExtractOptions::default();
        Self {
            engine: Mutex::new(Box::new(engine)),
            rasterizer: Box::new(rasterizer),
            store: CropStore::new(&options.upload_dir, &options.url_prefix),
            options,
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.store = CropStore::new(&options.upload_dir, &options.url_prefix);
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Process one PDF into an ordered block list.
    ///
    /// Layout engine failures (corrupt or unsupported input) propagate.
    /// Individual crop failures only drop the affected image or table.
    pub fn process<P: AsRef<Path>>(&self, path: P) -> Result<ProcessResult> {
        let path = path.as_ref();
        let start = Instant::now();
        log::info!("Processing PDF: {}", path.display());

        sniff_pdf(path)?;

        let analysis = {
            let mut engine = self
                .engine
                .lock()
                .map_err(|_| Error::LayoutEngine("layout engine lock poisoned".into()))?;
            log::debug!("Running layout engine {}", engine.name());
            engine.analyze(path)?
        };

        let mut elements = normalize(analysis.items);
        sort_visual(&mut elements);

        let mut regions = RegionIndex::collect(&elements, |_| true);

        if !regions.is_empty() {
            self.store.ensure_dir()?;
            let document = self.rasterizer.open(path)?;
            crop_regions(&mut elements, document.as_ref(), &self.store, &self.options);
        }

        if !self.options.suppress_with_rejected_regions {
            regions = RegionIndex::collect(&elements, |e| e.image_path.is_some());
        }

        let blocks = self.assemble(elements, &regions);

        let elapsed = start.elapsed().as_secs_f64();
        log::info!(
            "Finished {} in {:.2}s: {} blocks",
            path.display(),
            elapsed,
            blocks.len()
        );

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(ProcessResult::success(
            filename,
            analysis.page_count,
            format!("{:.2}s", elapsed),
            blocks,
        ))
    }

    /// Final block list in visual order.
    fn assemble(&self, elements: Vec<Element>, regions: &RegionIndex) -> Vec<Element> {
        let mut blocks = Vec::with_capacity(elements.len());

        for element in elements {
            if element.is_divider() {
                blocks.push(element);
                continue;
            }

            if element.is_visual() {
                if element.image_path.is_some() {
                    blocks.push(element);
                }
                continue;
            }

            match check_text(&element, regions, self.options.overlap_threshold) {
                Ok(()) => {}
                Err(TextRejection::OverlapsRegion) => {
                    log::debug!(
                        "Skipped overlapping text on page {}: {}",
                        element.page,
                        element.text.chars().take(20).collect::<String>()
                    );
                    continue;
                }
                Err(reason) => {
                    log::debug!("Skipped text on page {}: {:?}", element.page, reason);
                    continue;
                }
            }

            if let Some(block) = classify(element) {
                if !block.text.is_empty() {
                    blocks.push(block);
                }
            }
        }

        blocks
    }
}
