//! Rasterization of image and table regions.

use crate::backend::{CropStore, RasterDocument, StoredCrop};
use crate::error::Result;
use crate::geometry::{to_raster_rect, RasterRect};
use crate::model::{BBox, Element};

use super::ExtractOptions;

/// Why a region was not cropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Width or height below the minimum region size (points)
    TooSmall { width: f32, height: f32 },
    /// Width/height ratio outside the accepted range
    AspectRatio(f32),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TooSmall { width, height } => {
                write!(f, "too small: {:.1}x{:.1} pts", width, height)
            }
            Rejection::AspectRatio(ratio) => write!(f, "extreme aspect ratio: {:.2}", ratio),
        }
    }
}

/// Artifact check for a clamped raster region.
///
/// Rejects decorative rules, thin borders and near-degenerate boxes.
pub fn check_region(rect: &RasterRect, options: &ExtractOptions) -> Option<Rejection> {
    let (width, height) = (rect.width(), rect.height());
    if width < options.min_region_size || height < options.min_region_size {
        return Some(Rejection::TooSmall { width, height });
    }

    let ratio = rect.aspect_ratio();
    if !options.aspect_ratio_range.contains(&ratio) {
        return Some(Rejection::AspectRatio(ratio));
    }

    None
}

/// Crop every image/table element that has a bounding box.
///
/// Accepted regions get `image_path`/`image_filename` attached. Rejected
/// regions and per-element failures leave the element without a crop.
/// Returns the number of crops written.
pub fn crop_regions(
    elements: &mut [Element],
    document: &dyn RasterDocument,
    store: &CropStore,
    options: &ExtractOptions,
) -> usize {
    let page_count = document.page_count();
    let mut cropped = 0;

    let candidates = elements
        .iter_mut()
        .filter(|e| e.is_visual() && e.bbox.is_some());

    for (index, element) in candidates.enumerate() {
        if element.page > page_count {
            log::debug!(
                "Skipped {} on page {}: document has {} pages",
                element.block_type,
                element.page,
                page_count
            );
            continue;
        }

        match crop_one(element, index, document, store, options) {
            Ok(Some(crop)) => {
                element.attach_crop(crop.path, crop.filename);
                cropped += 1;
            }
            Ok(None) => {}
            Err(e) => log::warn!(
                "Failed to crop {} on page {}: {}",
                element.block_type,
                element.page,
                e
            ),
        }
    }

    log::debug!("Cropped {} image/table regions", cropped);
    cropped
}

fn crop_one(
    element: &Element,
    index: usize,
    document: &dyn RasterDocument,
    store: &CropStore,
    options: &ExtractOptions,
) -> Result<Option<StoredCrop>> {
    let Some(bbox) = element.bbox else {
        return Ok(None);
    };

    let (width, height) = document.page_dimensions(element.page)?;
    let (x0, y0) = document.page_origin(element.page)?;
    let local = BBox::new(
        bbox.left - x0,
        bbox.top - y0,
        bbox.right - x0,
        bbox.bottom - y0,
    );
    let rect = to_raster_rect(&local, width, height);

    if let Some(reason) = check_region(&rect, options) {
        log::info!("Skipped region on page {}: {}", element.page, reason);
        return Ok(None);
    }

    let pixels = document.render(element.page, &rect, options.render_scale())?;
    store.save(&pixels, index).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockType;
    use image::DynamicImage;
    use std::cell::RefCell;

    /// Single page whose MediaBox starts at (36, 72); records rendered rects.
    struct OffsetPage {
        rendered: RefCell<Vec<RasterRect>>,
    }

    impl RasterDocument for OffsetPage {
        fn page_count(&self) -> u32 {
            1
        }

        fn page_dimensions(&self, _page: u32) -> Result<(f32, f32)> {
            Ok((612.0, 792.0))
        }

        fn page_origin(&self, _page: u32) -> Result<(f32, f32)> {
            Ok((36.0, 72.0))
        }

        fn render(&self, _page: u32, rect: &RasterRect, _scale: f32) -> Result<DynamicImage> {
            self.rendered.borrow_mut().push(*rect);
            Ok(DynamicImage::new_rgb8(2, 2))
        }
    }

    #[test]
    fn test_crop_uses_page_origin() {
        let dir = tempfile::tempdir().unwrap();
        let store = CropStore::new(dir.path(), "/uploads");
        let page = OffsetPage {
            rendered: RefCell::new(Vec::new()),
        };
        let mut elements = vec![Element::new(BlockType::Image, "", 1)
            .with_bbox(BBox::new(136.0, 572.0, 336.0, 372.0))];

        let cropped = crop_regions(&mut elements, &page, &store, &ExtractOptions::default());

        assert_eq!(cropped, 1);
        assert_eq!(
            page.rendered.borrow().as_slice(),
            &[RasterRect::new(100.0, 292.0, 300.0, 492.0)]
        );
    }

    #[test]
    fn test_check_region_accepts_normal_figure() {
        let options = ExtractOptions::default();
        let rect = RasterRect::new(0.0, 0.0, 120.0, 90.0);
        assert_eq!(check_region(&rect, &options), None);
    }

    #[test]
    fn test_check_region_rejects_narrow_strip() {
        // Aspect 0.05 is inside the accepted range, but 10pt is too narrow.
        let options = ExtractOptions::default();
        let rect = RasterRect::new(0.0, 0.0, 10.0, 200.0);
        assert!(matches!(
            check_region(&rect, &options),
            Some(Rejection::TooSmall { .. })
        ));
    }

    #[test]
    fn test_check_region_rejects_extreme_ratio() {
        let options = ExtractOptions::default();
        let rule = RasterRect::new(0.0, 0.0, 2000.0, 60.0);
        assert!(matches!(
            check_region(&rule, &options),
            Some(Rejection::AspectRatio(r)) if r > 30.0
        ));

        let edge = RasterRect::new(0.0, 0.0, 1500.0, 50.0);
        assert_eq!(check_region(&edge, &options), None);
    }

    #[test]
    fn test_rejection_display() {
        let r = Rejection::TooSmall {
            width: 10.0,
            height: 200.0,
        };
        assert_eq!(r.to_string(), "too small: 10.0x200.0 pts");
    }
}
