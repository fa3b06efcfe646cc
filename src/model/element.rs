//! Block-level element types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Open key-value metadata attached to an element (heading level, image URL, ...).
pub type Props = BTreeMap<String, Value>;

/// Canonical block types understood by the block editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    /// Section heading (level 1-3 in `props.level`)
    Heading,
    /// Body text
    Paragraph,
    /// Unordered list item
    BulletListItem,
    /// Ordered list item
    NumberedListItem,
    /// Picture or figure crop
    Image,
    /// Table rendered as an image crop
    Table,
    /// Page boundary marker
    Divider,
}

impl BlockType {
    /// Whether this type is backed by a raster crop instead of text.
    pub fn is_visual(self) -> bool {
        matches!(self, BlockType::Image | BlockType::Table)
    }

    /// Name used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Heading => "heading",
            BlockType::Paragraph => "paragraph",
            BlockType::BulletListItem => "bulletListItem",
            BlockType::NumberedListItem => "numberedListItem",
            BlockType::Image => "image",
            BlockType::Table => "table",
            BlockType::Divider => "divider",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounding box in document space: origin at the page bottom-left, y grows upward.
///
/// Serialized as a `[left, top, right, bottom]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BBox {
    /// Create a bounding box from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Visually highest edge (largest y in document space).
    pub fn visual_top(&self) -> f32 {
        self.top.max(self.bottom)
    }

    /// Visually lowest edge.
    pub fn visual_bottom(&self) -> f32 {
        self.top.min(self.bottom)
    }

    /// Leftmost edge regardless of the order the engine reported them in.
    pub fn visual_left(&self) -> f32 {
        self.left.min(self.right)
    }

    /// Area of the box. Zero or negative when the box is degenerate.
    pub fn area(&self) -> f32 {
        (self.right - self.left) * (self.visual_top() - self.visual_bottom())
    }

    /// Whether the box encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.area() <= 0.0
    }
}

impl From<[f32; 4]> for BBox {
    fn from([left, top, right, bottom]: [f32; 4]) -> Self {
        Self::new(left, top, right, bottom)
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.left, b.top, b.right, b.bottom]
    }
}

/// One structural fragment of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Canonical block type
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Normalized plain text (empty for images, tables and dividers)
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Position in document space; absent for dividers
    pub bbox: Option<BBox>,

    /// Type-specific metadata
    pub props: Props,

    /// Storage reference of the rasterized crop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    /// File name of the rasterized crop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,

    /// Nesting level reported by the layout engine
    #[serde(skip)]
    pub nesting_level: Option<u32>,
}

impl Element {
    /// Create an element with the given type, text and page.
    pub fn new(block_type: BlockType, text: impl Into<String>, page: u32) -> Self {
        Self {
            block_type,
            text: text.into(),
            page: page.max(1),
            bbox: None,
            props: Props::new(),
            image_path: None,
            image_filename: None,
            nesting_level: None,
        }
    }

    /// Create a page divider introducing `page`.
    pub fn divider(page: u32) -> Self {
        Self::new(BlockType::Divider, "", page)
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Set the layout engine's nesting level.
    pub fn with_nesting_level(mut self, level: u32) -> Self {
        self.nesting_level = Some(level);
        self
    }

    /// Heading level from `props.level`, if set.
    pub fn heading_level(&self) -> Option<u8> {
        self.props
            .get("level")
            .and_then(Value::as_u64)
            .and_then(|l| u8::try_from(l).ok())
    }

    /// Whether this element is an image or table.
    pub fn is_visual(&self) -> bool {
        self.block_type.is_visual()
    }

    /// Whether this element is a page divider.
    pub fn is_divider(&self) -> bool {
        self.block_type == BlockType::Divider
    }

    /// Attach a stored crop to this element.
    pub fn attach_crop(&mut self, path: impl Into<String>, filename: impl Into<String>) {
        let path = path.into();
        let filename = filename.into();
        self.props.insert("url".into(), Value::from(path.clone()));
        self.props.insert("name".into(), Value::from(filename.clone()));
        self.image_path = Some(path);
        self.image_filename = Some(filename);
    }
}
