// file: src/models/extracted_text.rs
// description: plain text extracted from a document, kept with its source segments

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Page,
    Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub segment_kind: SegmentKind,
    pub segments: Vec<String>,
    pub text: String,
}

impl ExtractedText {
    /// Segments are joined with a single space, in source order.
    pub fn from_segments(segment_kind: SegmentKind, segments: Vec<String>) -> Self {
        let text = segments.join(" ");
        Self {
            segment_kind,
            segments,
            text,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_joined_with_single_space() {
        let text = ExtractedText::from_segments(
            SegmentKind::Page,
            vec!["first page".to_string(), "second page".to_string()],
        );
        assert_eq!(text.text, "first page second page");
        assert_eq!(text.word_count(), 4);
        assert!(!text.is_blank());
    }

    #[test]
    fn test_blank_text() {
        let text = ExtractedText::from_segments(SegmentKind::Paragraph, vec![" ".to_string()]);
        assert!(text.is_blank());
    }
}
