// file: src/models/search_hit.rs
// description: Keyword match and highlighted search result models
// reference: Used for similarity matching and annotation results

use crate::utils::Validator;
use serde::{Deserialize, Serialize};

/// Longest query echoed back in a summary.
const SUMMARY_QUERY_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Keyword text as extracted from the document
    pub keyword: String,

    /// Position of the keyword in the extracted keyword order
    pub index: usize,

    /// Cosine similarity between query and keyword (range -1.0..=1.0)
    pub similarity: f32,
}

impl KeywordMatch {
    pub fn new(keyword: String, index: usize, similarity: f32) -> Self {
        Self {
            keyword,
            index,
            similarity,
        }
    }

    pub fn similarity_percent(&self) -> f32 {
        self.similarity * 100.0
    }
}

/// Successful search: the matched keyword and the highlighted document.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub query: String,
    pub keyword_match: KeywordMatch,

    /// 1-based page numbers with at least one occurrence, ascending
    pub pages: Vec<u32>,

    /// Highlighted PDF
    pub pdf: Vec<u8>,
}

impl SearchHit {
    pub fn first_page(&self) -> Option<u32> {
        self.pages.first().copied()
    }

    /// Format as a summary string for display
    pub fn format_summary(&self) -> String {
        let pages = self
            .pages
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "The word '{}' ({:.1}% similar to '{}') occurs on page(s) {}",
            self.keyword_match.keyword,
            self.keyword_match.similarity_percent(),
            Validator::truncate_text(&self.query, SUMMARY_QUERY_CHARS),
            pages
        )
    }
}
