//! Visual reading order.

use std::cmp::Ordering;

use crate::model::Element;

/// Sort key: page, then top-to-bottom, then left-to-right.
///
/// Dividers open their page. Other elements without geometry sort as if
/// they sat at y = 0, x = 0.
fn sort_key(element: &Element) -> (u32, f32, f32) {
    if element.is_divider() {
        return (element.page, f32::NEG_INFINITY, f32::NEG_INFINITY);
    }
    match element.bbox {
        Some(bbox) => (element.page, -bbox.visual_top(), bbox.visual_left()),
        None => (element.page, 0.0, 0.0),
    }
}

fn compare(a: &Element, b: &Element) -> Ordering {
    let (page_a, y_a, x_a) = sort_key(a);
    let (page_b, y_b, x_b) = sort_key(b);
    page_a
        .cmp(&page_b)
        .then_with(|| y_a.total_cmp(&y_b))
        .then_with(|| x_a.total_cmp(&x_b))
}

/// Stable sort into visual order; ties keep engine order.
pub fn sort_visual(elements: &mut [Element]) {
    elements.sort_by(compare);
}
