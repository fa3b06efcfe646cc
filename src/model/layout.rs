//! Raw output of the layout analysis engine.

use super::BBox;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A structural item as reported by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Engine label, e.g. "section_header", "paragraph", "picture"
    pub label: String,

    /// Page number (1-indexed; 0 when the engine had no provenance)
    #[serde(default)]
    pub page: u32,

    /// Position in document space
    #[serde(default)]
    pub bbox: Option<BBox>,

    /// Nesting level in the engine's document tree
    #[serde(default)]
    pub level: Option<u32>,

    /// Extractable text
    #[serde(default)]
    pub text: String,
}

impl LayoutItem {
    /// Create an item without geometry.
    pub fn new(label: impl Into<String>, page: u32, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            page,
            bbox: None,
            level: None,
            text: text.into(),
        }
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Set the nesting level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }
}

/// Full result of analyzing one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutAnalysis {
    /// Number of pages in the source document
    pub page_count: u32,

    /// Items in the order the engine emitted them
    pub items: Vec<LayoutItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutPayload {
    Full(LayoutAnalysis),
    Items(Vec<LayoutItem>),
}

impl LayoutAnalysis {
    /// Create an analysis result.
    pub fn new(page_count: u32, items: Vec<LayoutItem>) -> Self {
        Self { page_count, items }
    }

    /// Decode engine JSON.
    ///
    /// Accepts either `{"page_count": N, "items": [...]}` or a bare array of
    /// items, in which case the page count is the highest page referenced.
    pub fn from_json(json: &str) -> Result<Self> {
        let analysis = match serde_json::from_str(json)? {
            LayoutPayload::Full(analysis) => analysis,
            LayoutPayload::Items(items) => {
                let page_count = items.iter().map(|i| i.page.max(1)).max().unwrap_or(0);
                Self::new(page_count, items)
            }
        };
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_full() {
        let json = r#"{
            "page_count": 4,
            "items": [
                {"label": "title", "page": 1, "bbox": [72, 720, 540, 700], "level": 1, "text": "Report"},
                {"label": "picture", "page": 2, "bbox": null, "text": ""}
            ]
        }"#;
        let analysis = LayoutAnalysis::from_json(json).unwrap();
        assert_eq!(analysis.page_count, 4);
        assert_eq!(analysis.items.len(), 2);
        assert_eq!(
            analysis.items[0].bbox,
            Some(BBox::new(72.0, 720.0, 540.0, 700.0))
        );
        assert_eq!(analysis.items[0].level, Some(1));
        assert!(analysis.items[1].bbox.is_none());
    }

    #[test]
    fn test_from_json_bare_items() {
        let json = r#"[
            {"label": "text", "page": 1, "text": "a"},
            {"label": "text", "page": 3, "text": "b"}
        ]"#;
        let analysis = LayoutAnalysis::from_json(json).unwrap();
        assert_eq!(analysis.page_count, 3);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(LayoutAnalysis::from_json("{\"items\": 3}").is_err());
    }
}
