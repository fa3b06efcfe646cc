//! Page rasterizer using lopdf for geometry and poppler's `pdftoppm` for pixels.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::{DynamicImage, ImageFormat};
use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::geometry::{rotate_rect, RasterRect};
use crate::pipeline::PDF_POINTS_PER_INCH;

use super::{PageRasterizer, RasterDocument};

/// US Letter, used when a page declares no usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Limit on page-tree ancestors walked when resolving an inherited MediaBox.
const MAX_TREE_DEPTH: usize = 32;

/// Renders page regions with the `pdftoppm` command.
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    program: PathBuf,
}

impl PopplerRasterizer {
    /// Use `pdftoppm` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("pdftoppm")
    }

    /// Use a specific `pdftoppm` binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PopplerRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRasterizer for PopplerRasterizer {
    fn open(&self, path: &Path) -> Result<Box<dyn RasterDocument>> {
        let doc = LopdfDocument::load(path)?;
        let pages = doc
            .get_pages()
            .values()
            .map(|&id| page_box(&doc, id))
            .collect();

        Ok(Box::new(PopplerDocument {
            program: self.program.clone(),
            path: path.to_path_buf(),
            pages,
        }))
    }
}

/// Page geometry resolved from the page tree.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageBox {
    /// Lower-left corner of the MediaBox
    origin: (f32, f32),
    /// Unrotated width and height
    size: (f32, f32),
    /// Clockwise display rotation in degrees
    rotate: i64,
}

impl Default for PageBox {
    fn default() -> Self {
        Self {
            origin: (0.0, 0.0),
            size: DEFAULT_PAGE_SIZE,
            rotate: 0,
        }
    }
}

/// Nearest inherited MediaBox and Rotate in the page tree.
fn page_box(doc: &LopdfDocument, page_id: ObjectId) -> PageBox {
    let mut media_box = None;
    let mut rotate = None;
    let mut node = doc.get_dictionary(page_id).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(dict) = node else { break };

        if media_box.is_none() {
            media_box = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|obj| media_box_rect(doc, obj));
        }
        if rotate.is_none() {
            rotate = dict
                .get(b"Rotate")
                .ok()
                .and_then(|obj| doc.dereference(obj).ok())
                .and_then(|(_, obj)| obj.as_i64().ok());
        }
        if media_box.is_some() && rotate.is_some() {
            break;
        }

        node = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|parent| doc.get_dictionary(parent))
            .ok();
    }

    let mut page = PageBox::default();
    if let Some((origin, size)) = media_box {
        page.origin = origin;
        page.size = size;
    }
    page.rotate = rotate.unwrap_or(0).rem_euclid(360);
    page
}

/// MediaBox as (lower-left origin, size).
fn media_box_rect(doc: &LopdfDocument, obj: &Object) -> Option<((f32, f32), (f32, f32))> {
    let (_, obj) = doc.dereference(obj).ok()?;
    let coords = obj
        .as_array()
        .ok()?
        .iter()
        .map(|v| v.as_float().ok())
        .collect::<Option<Vec<f32>>>()?;

    match coords.as_slice() {
        [x0, y0, x1, y1] => Some((
            (x0.min(*x1), y0.min(*y1)),
            ((x1 - x0).abs(), (y1 - y0).abs()),
        )),
        _ => None,
    }
}

/// Open document handle. Holds no OS resources between renders.
struct PopplerDocument {
    program: PathBuf,
    path: PathBuf,
    pages: Vec<PageBox>,
}

impl PopplerDocument {
    fn page(&self, page: u32) -> Result<&PageBox> {
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

impl RasterDocument for PopplerDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_dimensions(&self, page: u32) -> Result<(f32, f32)> {
        self.page(page).map(|p| p.size)
    }

    fn page_origin(&self, page: u32) -> Result<(f32, f32)> {
        self.page(page).map(|p| p.origin)
    }

    fn render(&self, page: u32, rect: &RasterRect, scale: f32) -> Result<DynamicImage> {
        let geometry = self.page(page)?;
        let (width, height) = geometry.size;

        // pdftoppm renders the page as displayed, so follow its rotation.
        let pixels = rotate_rect(rect, width, height, geometry.rotate).scaled(scale);
        let x = pixels.x0.floor();
        let y = pixels.y0.floor();
        let width = (pixels.x1.ceil() - x).max(1.0);
        let height = (pixels.y1.ceil() - y).max(1.0);
        let dpi = scale * PDF_POINTS_PER_INCH;

        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-singlefile")
            .args(["-f", &page.to_string(), "-l", &page.to_string()])
            .args(["-r", &format!("{dpi:.0}")])
            .args(["-x", &format!("{x:.0}"), "-y", &format!("{y:.0}")])
            .args(["-W", &format!("{width:.0}"), "-H", &format!("{height:.0}")])
            .arg(&self.path)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::Rasterize(format!(
                    "{} not found; install poppler-utils",
                    self.program.display()
                )),
                _ => Error::Io(e),
            })?;

        if !output.status.success() {
            return Err(Error::Rasterize(format!(
                "page {}: {}",
                page,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(image::load_from_memory_with_format(
            &output.stdout,
            ImageFormat::Png,
        )?)
    }
}
