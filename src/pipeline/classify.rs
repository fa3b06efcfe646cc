//! Heuristic reclassification of elements into the final block taxonomy.
//!
//! Layout labels are unreliable for headings and list types. The rules here
//! recover structure from cheap textual signals. They are evaluated in
//! [`RULES`] order and the first match wins; heading levels and the noise
//! filter are applied afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::model::{BlockType, Element};

/// Section names that always start a heading.
pub const CORE_KEYWORDS: &[&str] = &[
    "Abstract",
    "Introduction",
    "Related Work",
    "Methodology",
    "Experiments",
    "Results",
    "Discussion",
    "Conclusion",
    "References",
    "Acknowledgement",
];

/// Korean section names: introduction, body, conclusion, summary,
/// references, abstract, methodology, results.
pub const CORE_KEYWORDS_KO: &[&str] = &[
    "서론",
    "본론",
    "결론",
    "요약",
    "참고문헌",
    "초록",
    "방법론",
    "결과",
];

/// Strong headers must be shorter than this many characters.
const STRONG_HEADER_MAX_CHARS: usize = 40;
/// Numbered paragraphs are promoted to headings below this length.
const NUMBERED_HEADING_MAX_CHARS: usize = 60;
/// Short headings without numbering are level 2.
const SHORT_HEADING_CHARS: usize = 15;
/// Deepest heading level emitted.
const MAX_HEADING_LEVEL: u8 = 3;

static KEYWORDS_LOWER: Lazy<Vec<String>> = Lazy::new(|| {
    CORE_KEYWORDS
        .iter()
        .chain(CORE_KEYWORDS_KO)
        .map(|k| k.to_lowercase())
        .collect()
});

static NUMBERED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(\.\d+)*[.\s]|[IVXLC]+\.|[●○])").unwrap());
static BULLET_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•]\s*").unwrap());
static NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+[.)]|[①-⑳])").unwrap());
static SECTION_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?\s+[A-Z가-힣]").unwrap());
static SUBSECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+").unwrap());

const BULLET_PREFIXES: [&str; 3] = ["- ", "* ", "• "];

/// A type-changing classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Short text starting with a core section keyword becomes a heading.
    StrongSectionHeader,
    /// Short paragraph with a section-number, roman-numeral or bullet-glyph
    /// prefix becomes a heading.
    NumberedHeading,
    /// List items are split into bullet and numbered items; bullet markers are stripped.
    ListItem,
}

/// Rules in precedence order.
pub const RULES: [Rule; 3] = [
    Rule::StrongSectionHeader,
    Rule::NumberedHeading,
    Rule::ListItem,
];

/// Outcome of a matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reclassification {
    Heading,
    BulletItem { text: String },
    NumberedItem,
}

impl Rule {
    /// Evaluate this rule against an element's current type and text.
    pub fn apply(self, block_type: BlockType, text: &str) -> Option<Reclassification> {
        let chars = text.chars().count();
        match self {
            Rule::StrongSectionHeader => {
                let lower = text.to_lowercase();
                let keyword = KEYWORDS_LOWER.iter().any(|k| lower.starts_with(k.as_str()));
                (keyword && chars < STRONG_HEADER_MAX_CHARS).then_some(Reclassification::Heading)
            }
            Rule::NumberedHeading => (block_type == BlockType::Paragraph
                && chars < NUMBERED_HEADING_MAX_CHARS
                && NUMBERED_HEADING.is_match(text))
            .then_some(Reclassification::Heading),
            Rule::ListItem => {
                let bulleted_paragraph = block_type == BlockType::Paragraph
                    && BULLET_PREFIXES.iter().any(|p| text.starts_with(p));
                if block_type != BlockType::BulletListItem && !bulleted_paragraph {
                    return None;
                }
                if NUMBERED_ITEM.is_match(text) {
                    return Some(Reclassification::NumberedItem);
                }
                Some(Reclassification::BulletItem {
                    text: BULLET_MARKER.replace(text, "").into_owned(),
                })
            }
        }
    }
}

/// Whether the text contains a core section keyword anywhere.
fn mentions_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    KEYWORDS_LOWER.iter().any(|k| lower.contains(k.as_str()))
}

/// Heading level derived from the text and the engine's nesting level.
pub fn heading_level(text: &str, nesting_level: Option<u32>) -> u8 {
    let level = if SECTION_TITLE.is_match(text) || mentions_keyword(text) {
        1
    } else if SUBSECTION.is_match(text) || text.chars().count() < SHORT_HEADING_CHARS {
        2
    } else {
        3
    };

    match nesting_level {
        Some(nesting) if nesting > 1 => (level + 1).min(MAX_HEADING_LEVEL),
        _ => level,
    }
}

/// Paragraphs that are too short or only decimal digits (page numbers, stray marks).
///
/// Fractions and roman numerals such as "½" or "Ⅻ" are not digits and stay.
fn is_noise(text: &str) -> bool {
    text.chars().count() < 2 || text.chars().all(|c| c.is_ascii_digit())
}

/// Classify one text element.
///
/// Returns `None` when the element is noise and must not be emitted.
/// Re-classifying an already classified heading keeps its type and
/// re-derives the same level.
pub fn classify(mut element: Element) -> Option<Element> {
    let original = element.text.clone();

    let decision = RULES
        .iter()
        .find_map(|rule| rule.apply(element.block_type, &original));
    match decision {
        Some(Reclassification::Heading) => element.block_type = BlockType::Heading,
        Some(Reclassification::BulletItem { text }) => {
            element.block_type = BlockType::BulletListItem;
            element.text = text;
        }
        Some(Reclassification::NumberedItem) => element.block_type = BlockType::NumberedListItem,
        None => {}
    }

    match element.block_type {
        BlockType::Heading => {
            let level = heading_level(&original, element.nesting_level);
            element.props.insert("level".into(), Value::from(level));
        }
        BlockType::Paragraph if is_noise(&original) => {
            log::debug!("Dropped noise paragraph on page {}: {:?}", element.page, original);
            return None;
        }
        _ => {}
    }

    Some(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Element {
        Element::new(BlockType::Paragraph, text, 1)
    }

    fn classified(element: Element) -> (BlockType, String, Option<u8>) {
        let el = classify(element).expect("element kept");
        let level = el.heading_level();
        (el.block_type, el.text, level)
    }

    // ==================== Rule Tests ====================

    #[test]
    fn test_strong_header_rule() {
        let rule = Rule::StrongSectionHeader;
        assert_eq!(
            rule.apply(BlockType::Paragraph, "INTRODUCTION"),
            Some(Reclassification::Heading)
        );
        assert_eq!(
            rule.apply(BlockType::BulletListItem, "Related work overview"),
            Some(Reclassification::Heading)
        );
        assert_eq!(
            rule.apply(BlockType::Paragraph, "결론 및 향후 연구"),
            Some(Reclassification::Heading)
        );
        // Too long.
        let long = "Results show that the proposed method outperforms baselines";
        assert_eq!(rule.apply(BlockType::Paragraph, long), None);
        // Keyword not at the start.
        assert_eq!(rule.apply(BlockType::Paragraph, "Our Results"), None);
    }

    #[test]
    fn test_numbered_heading_rule() {
        let rule = Rule::NumberedHeading;
        for text in ["3 Method", "2.1. Data", "4.2 Setup", "IV. Evaluation", "● Overview"] {
            assert_eq!(
                rule.apply(BlockType::Paragraph, text),
                Some(Reclassification::Heading),
                "{text}"
            );
        }
        assert_eq!(rule.apply(BlockType::Paragraph, "Table 3 lists results"), None);
        assert_eq!(rule.apply(BlockType::Paragraph, "2020"), None);
        assert_eq!(rule.apply(BlockType::BulletListItem, "1. First"), None);
        let long = "1. This numbered sentence is clearly far too long to be any kind of title";
        assert_eq!(rule.apply(BlockType::Paragraph, long), None);
    }

    #[test]
    fn test_list_item_rule() {
        let rule = Rule::ListItem;
        assert_eq!(
            rule.apply(BlockType::Paragraph, "- first point"),
            Some(Reclassification::BulletItem {
                text: "first point".into()
            })
        );
        assert_eq!(
            rule.apply(BlockType::BulletListItem, "• second"),
            Some(Reclassification::BulletItem {
                text: "second".into()
            })
        );
        assert_eq!(
            rule.apply(BlockType::BulletListItem, "1) step one"),
            Some(Reclassification::NumberedItem)
        );
        assert_eq!(
            rule.apply(BlockType::BulletListItem, "③ third"),
            Some(Reclassification::NumberedItem)
        );
        assert_eq!(rule.apply(BlockType::Paragraph, "-dash without space"), None);
        assert_eq!(rule.apply(BlockType::Heading, "- x"), None);
    }

    // ==================== Classification Tests ====================

    #[test]
    fn test_numbered_section_heading_level_one() {
        assert_eq!(
            classified(para("1. Introduction")),
            (BlockType::Heading, "1. Introduction".into(), Some(1))
        );
    }

    #[test]
    fn test_subsection_level_two() {
        assert_eq!(
            classified(para("2.3 Training details of the model")).2,
            Some(2)
        );
    }

    #[test]
    fn test_short_heading_level_two_and_long_level_three() {
        let short = Element::new(BlockType::Heading, "Setup", 1);
        assert_eq!(classified(short).2, Some(2));

        let long = Element::new(BlockType::Heading, "Evaluation on public benchmarks", 1);
        assert_eq!(classified(long).2, Some(3));
    }

    #[test]
    fn test_keyword_anywhere_is_level_one() {
        let el = Element::new(BlockType::Heading, "Summary of the main results", 1);
        assert_eq!(classified(el).2, Some(1));
    }

    #[test]
    fn test_nesting_raises_level() {
        let nested = Element::new(BlockType::Heading, "Setup", 1).with_nesting_level(2);
        assert_eq!(classified(nested).2, Some(3));

        let nested_top = Element::new(BlockType::Heading, "Conclusion", 1).with_nesting_level(3);
        assert_eq!(classified(nested_top).2, Some(2));

        let shallow = Element::new(BlockType::Heading, "Conclusion", 1).with_nesting_level(1);
        assert_eq!(classified(shallow).2, Some(1));
    }

    #[test]
    fn test_bullet_paragraph_stripped() {
        assert_eq!(
            classified(para("* item text")),
            (BlockType::BulletListItem, "item text".into(), None)
        );
    }

    #[test]
    fn test_numbered_list_keeps_text() {
        let el = Element::new(BlockType::BulletListItem, "2. second step", 1);
        assert_eq!(
            classified(el),
            (BlockType::NumberedListItem, "2. second step".into(), None)
        );
    }

    #[test]
    fn test_plain_paragraph_untouched() {
        let text = "This is an ordinary sentence of body text.";
        assert_eq!(
            classified(para(text)),
            (BlockType::Paragraph, text.into(), None)
        );
    }

    #[test]
    fn test_noise_paragraphs_dropped() {
        assert!(classify(para("7")).is_none());
        assert!(classify(para("x")).is_none());
        assert!(classify(para("1234")).is_none());
        assert!(classify(para("ab")).is_some());
    }

    #[test]
    fn test_fractions_are_not_digits() {
        let el = classify(para("½¾")).expect("fraction kept");
        assert_eq!(el.block_type, BlockType::Paragraph);
        assert!(classify(para("ⅫⅡ")).is_some());
        assert!(classify(para("007")).is_none());
    }

    #[test]
    fn test_numeric_heading_survives_noise_filter() {
        // Only paragraphs are noise-filtered; a numeric-only heading is kept.
        let el = classify(Element::new(BlockType::Heading, "12", 1)).unwrap();
        assert_eq!(el.block_type, BlockType::Heading);
        assert_eq!(el.heading_level(), Some(2));
    }

    #[test]
    fn test_classification_is_idempotent_for_headings() {
        let first = classify(para("3 Experimental Setup").with_nesting_level(2)).unwrap();
        let second = classify(first.clone()).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.block_type, BlockType::Heading);
    }

    #[test]
    fn test_classification_is_idempotent_for_lists() {
        let first = classify(Element::new(BlockType::BulletListItem, "1. go", 1)).unwrap();
        assert_eq!(classify(first.clone()).unwrap(), first);

        let bullet = classify(para("- plain item")).unwrap();
        assert_eq!(classify(bullet.clone()).unwrap(), bullet);
    }
}
