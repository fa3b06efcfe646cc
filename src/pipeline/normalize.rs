//! Conversion of raw layout items into canonical elements.

use unicode_normalization::UnicodeNormalization;

use crate::model::{BlockType, Element, LayoutItem};

/// Map a raw engine label to a provisional block type.
///
/// Labels are compared case-insensitively with spaces and hyphens folded to
/// underscores, so "Section Header", "SECTION_HEADER" and "section-header"
/// all match. Unknown labels fall back to paragraph.
pub fn provisional_type(label: &str) -> BlockType {
    let key: String = label
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect();

    match key.as_str() {
        "section_header" | "title" => BlockType::Heading,
        "text" | "body_text" | "paragraph" | "caption" | "code" => BlockType::Paragraph,
        "list_item" => BlockType::BulletListItem,
        "picture" | "figure" => BlockType::Image,
        "table" => BlockType::Table,
        _ => BlockType::Paragraph,
    }
}

/// NFC-normalize, collapse whitespace runs to a single space and trim.
pub fn normalize_text(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn engine output into elements in encounter order.
///
/// A divider is inserted before the first item of every page beyond the
/// highest page seen so far. Text-bearing items whose text normalizes to
/// nothing are dropped; images and tables are kept regardless.
pub fn normalize(items: Vec<LayoutItem>) -> Vec<Element> {
    let mut elements = Vec::with_capacity(items.len());
    let mut last_page = 1;

    for item in items {
        let page = item.page.max(1);
        if page > last_page {
            elements.push(Element::divider(page));
            last_page = page;
        }

        let block_type = provisional_type(&item.label);
        let text = normalize_text(&item.text);
        if text.is_empty() && !block_type.is_visual() {
            continue;
        }

        let mut element = Element::new(block_type, text, page);
        element.bbox = item.bbox;
        element.nesting_level = item.level;
        elements.push(element);
    }

    log::debug!("Normalized {} elements", elements.len());
    elements
}
