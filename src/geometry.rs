//! Bounding-box arithmetic and coordinate-space conversion.
//!
//! Layout boxes live in document space (origin bottom-left, y up). Crops are
//! requested in raster space (origin top-left, y down).

use crate::model::BBox;

/// Default share of a text box that must be covered before it counts as a duplicate.
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.5;

/// Fraction of `text`'s area covered by `other`.
///
/// Always relative to the text box, so the result is not symmetric in its
/// arguments. Degenerate text boxes yield 0.
pub fn overlap_fraction(text: &BBox, other: &BBox) -> f32 {
    let text_area = text.area();
    if text_area <= 0.0 {
        return 0.0;
    }

    let left = text.left.max(other.left);
    let right = text.right.min(other.right);
    let low = text.visual_bottom().max(other.visual_bottom());
    let high = text.visual_top().min(other.visual_top());

    if right <= left || high <= low {
        return 0.0;
    }

    (right - left) * (high - low) / text_area
}

/// Whether `text` is covered by any candidate beyond `threshold`.
pub fn overlaps_any<'a, I>(text: &BBox, candidates: I, threshold: f32) -> bool
where
    I: IntoIterator<Item = &'a BBox>,
{
    candidates
        .into_iter()
        .any(|candidate| overlap_fraction(text, candidate) > threshold)
}

/// Rectangle in raster space (origin top-left, y down), in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl RasterRect {
    /// Create a rectangle from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Full-page rectangle for a page of the given size.
    pub fn page(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Width divided by height; 0 for an empty rectangle.
    pub fn aspect_ratio(&self) -> f32 {
        let height = self.height();
        if height <= 0.0 {
            return 0.0;
        }
        self.width() / height
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Intersection with `other`. Never grows beyond either input; an empty
    /// intersection collapses to a zero-sized rectangle.
    pub fn intersect(&self, other: &RasterRect) -> RasterRect {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1).max(x0);
        let y1 = self.y1.min(other.y1).max(y0);
        RasterRect::new(x0, y0, x1, y1)
    }

    /// Scale every coordinate, e.g. from points to pixels.
    pub fn scaled(&self, factor: f32) -> RasterRect {
        RasterRect::new(
            self.x0 * factor,
            self.y0 * factor,
            self.x1 * factor,
            self.y1 * factor,
        )
    }
}

/// Map a rect on the unrotated page onto the page as displayed with a
/// clockwise `/Rotate` of `degrees`. Values other than multiples of 90 are
/// treated as 0.
pub fn rotate_rect(
    rect: &RasterRect,
    page_width: f32,
    page_height: f32,
    degrees: i64,
) -> RasterRect {
    let (w, h) = (page_width, page_height);
    match degrees.rem_euclid(360) {
        90 => RasterRect::new(h - rect.y1, rect.x0, h - rect.y0, rect.x1),
        180 => RasterRect::new(w - rect.x1, h - rect.y1, w - rect.x0, h - rect.y0),
        270 => RasterRect::new(rect.y0, w - rect.x1, rect.y1, w - rect.x0),
        _ => *rect,
    }
}

/// Convert a document-space box to raster space and clamp it to the page.
pub fn to_raster_rect(bbox: &BBox, page_width: f32, page_height: f32) -> RasterRect {
    let flipped = RasterRect::new(
        bbox.left,
        page_height - bbox.visual_top(),
        bbox.right,
        page_height - bbox.visual_bottom(),
    );
    flipped.intersect(&RasterRect::page(page_width, page_height))
}
