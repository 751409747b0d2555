// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod extracted_text;
pub mod search_hit;

pub use document::{Document, DocumentKind};
pub use extracted_text::{ExtractedText, SegmentKind};
pub use search_hit::{KeywordMatch, SearchHit};
