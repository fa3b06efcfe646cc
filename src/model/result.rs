//! Pipeline result handed to the surrounding application.

use super::{BlockType, Element};
use serde::{Deserialize, Serialize};

/// Outcome of processing one PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Always "success"; failures are reported as errors instead
    pub status: String,

    /// Base name of the source file
    pub filename: String,

    /// Number of pages in the source document
    pub total_pages: u32,

    /// Wall-clock processing time, e.g. "1.23s"
    pub processed_time: String,

    /// Blocks in visual order
    pub blocks: Vec<Element>,
}

impl ProcessResult {
    /// Create a successful result.
    pub fn success(
        filename: impl Into<String>,
        total_pages: u32,
        processed_time: impl Into<String>,
        blocks: Vec<Element>,
    ) -> Self {
        Self {
            status: "success".to_string(),
            filename: filename.into(),
            total_pages,
            processed_time: processed_time.into(),
            blocks,
        }
    }

    /// Number of blocks of the given type.
    pub fn count(&self, block_type: BlockType) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.block_type == block_type)
            .count()
    }

    /// Plain text of all textual blocks, one per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter(|b| !b.text.is_empty())
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let result = ProcessResult::success(
            "paper.pdf",
            2,
            "0.10s",
            vec![
                Element::new(BlockType::Heading, "Intro", 1),
                Element::divider(2),
                Element::new(BlockType::Paragraph, "Body", 2),
            ],
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["total_pages"], 2);
        assert_eq!(json["blocks"].as_array().unwrap().len(), 3);
        assert_eq!(result.count(BlockType::Divider), 1);
        assert_eq!(result.plain_text(), "Intro\nBody");
    }
}
