//! Markdown preview of extracted blocks.

use crate::model::{BlockType, Element, ProcessResult};

/// Render blocks as Markdown, one block per paragraph.
pub fn to_markdown(result: &ProcessResult) -> String {
    let mut output = String::new();

    for block in &result.blocks {
        let rendered = render_block(block);
        if rendered.is_empty() {
            continue;
        }
        if !output.is_empty() {
            output.push_str("\n\n");
        }
        output.push_str(&rendered);
    }

    output
}

fn render_block(block: &Element) -> String {
    match block.block_type {
        BlockType::Heading => {
            let level = block.heading_level().unwrap_or(1).clamp(1, 6) as usize;
            format!("{} {}", "#".repeat(level), block.text)
        }
        BlockType::Paragraph => block.text.clone(),
        BlockType::BulletListItem => format!("- {}", block.text),
        BlockType::NumberedListItem => {
            // Keep an explicit number if the text already carries one.
            if block.text.starts_with(|c: char| c.is_ascii_digit()) {
                block.text.clone()
            } else {
                format!("1. {}", block.text)
            }
        }
        BlockType::Image | BlockType::Table => match block.image_path {
            Some(ref path) => format!(
                "![{}]({})",
                block.image_filename.as_deref().unwrap_or(""),
                path
            ),
            None => String::new(),
        },
        BlockType::Divider => "---".to_string(),
    }
}
