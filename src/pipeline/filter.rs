//! Removal of text that duplicates image/table regions or has no usable geometry.

use std::collections::BTreeMap;

use crate::geometry::overlaps_any;
use crate::model::{BBox, Element};

/// Image/table bounding boxes grouped by page.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    by_page: BTreeMap<u32, Vec<BBox>>,
}

impl RegionIndex {
    /// Collect the boxes of all image/table elements accepted by `include`.
    pub fn collect<'a, I, F>(elements: I, include: F) -> Self
    where
        I: IntoIterator<Item = &'a Element>,
        F: Fn(&Element) -> bool,
    {
        let mut by_page: BTreeMap<u32, Vec<BBox>> = BTreeMap::new();
        for element in elements {
            if !element.is_visual() || !include(element) {
                continue;
            }
            if let Some(bbox) = element.bbox {
                by_page.entry(element.page).or_default().push(bbox);
            }
        }
        Self { by_page }
    }

    /// Regions on `page`.
    pub fn on_page(&self, page: u32) -> &[BBox] {
        self.by_page.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of regions.
    pub fn len(&self) -> usize {
        self.by_page.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Why a text element was filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRejection {
    /// No bounding box, or one enclosing no area
    DegenerateGeometry,
    /// Covered by an image/table region on the same page
    OverlapsRegion,
    /// Nothing left after normalization
    EmptyText,
}

/// Decide whether a text element survives the overlap/noise filter.
pub fn check_text(
    element: &Element,
    regions: &RegionIndex,
    threshold: f32,
) -> Result<(), TextRejection> {
    let bbox = match element.bbox {
        Some(bbox) if !bbox.is_degenerate() => bbox,
        _ => return Err(TextRejection::DegenerateGeometry),
    };
    if overlaps_any(&bbox, regions.on_page(element.page), threshold) {
        return Err(TextRejection::OverlapsRegion);
    }
    if element.text.trim().is_empty() {
        return Err(TextRejection::EmptyText);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockType;

    fn image(page: u32, bbox: BBox) -> Element {
        Element::new(BlockType::Image, "", page).with_bbox(bbox)
    }

    fn text(page: u32, bbox: BBox) -> Element {
        Element::new(BlockType::Paragraph, "Figure 1: caption", page).with_bbox(bbox)
    }

    #[test]
    fn test_region_index_groups_by_page() {
        let b = BBox::new(0.0, 100.0, 100.0, 0.0);
        let elements = vec![
            image(1, b),
            image(2, b),
            Element::new(BlockType::Table, "", 2).with_bbox(b),
            text(1, b),
            Element::new(BlockType::Image, "", 3),
        ];
        let index = RegionIndex::collect(&elements, |_| true);
        assert_eq!(index.len(), 3);
        assert_eq!(index.on_page(1).len(), 1);
        assert_eq!(index.on_page(2).len(), 2);
        assert!(index.on_page(3).is_empty());
    }

    #[test]
    fn test_region_index_predicate() {
        let b = BBox::new(0.0, 100.0, 100.0, 0.0);
        let mut cropped = image(1, b);
        cropped.attach_crop("/uploads/a.png", "a.png");
        let elements = vec![cropped, image(1, b)];
        let index = RegionIndex::collect(&elements, |e| e.image_path.is_some());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_covered_text_rejected_same_page_only() {
        let region = BBox::new(100.0, 400.0, 300.0, 200.0);
        let elements = vec![image(1, region)];
        let index = RegionIndex::collect(&elements, |_| true);

        // 80% of the caption lies inside the image.
        let caption = BBox::new(120.0, 240.0, 220.0, 190.0);
        assert_eq!(
            check_text(&text(1, caption), &index, 0.5),
            Err(TextRejection::OverlapsRegion)
        );
        assert_eq!(check_text(&text(2, caption), &index, 0.5), Ok(()));
    }

    #[test]
    fn test_degenerate_and_empty_rejected() {
        let index = RegionIndex::default();
        let flat = BBox::new(0.0, 10.0, 100.0, 10.0);
        assert_eq!(
            check_text(&text(1, flat), &index, 0.5),
            Err(TextRejection::DegenerateGeometry)
        );
        assert_eq!(
            check_text(&Element::new(BlockType::Paragraph, "loose", 1), &index, 0.5),
            Err(TextRejection::DegenerateGeometry)
        );

        let blank = Element::new(BlockType::Paragraph, " ", 1)
            .with_bbox(BBox::new(0.0, 10.0, 100.0, 0.0));
        assert_eq!(
            check_text(&blank, &index, 0.5),
            Err(TextRejection::EmptyText)
        );
    }
}
