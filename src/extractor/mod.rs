// file: src/extractor/mod.rs
// description: plain text extraction for supported document formats
// reference: internal module structure

pub mod pdf;
pub mod word;

pub use pdf::extract_pdf;
pub use word::{docx_paragraphs, extract_docx};

use crate::error::Result;
use crate::models::{Document, DocumentKind, ExtractedText};
use tracing::debug;

/// Extract the searchable text of an upload.
///
/// `paginated` is the PDF the annotator works on: the upload itself for PDFs,
/// the converted document for Word files. Legacy `.doc` files are read from it
/// since their binary format has no paragraph reader.
pub fn extract_text(document: &Document, paginated: &[u8]) -> Result<ExtractedText> {
    let text = match document.kind {
        DocumentKind::Pdf => extract_pdf(&document.bytes)?,
        DocumentKind::Docx => extract_docx(&document.bytes)?,
        DocumentKind::Doc => extract_pdf(paginated)?,
    };

    debug!(
        "Extracted {} words from {} {} segment(s) of {}",
        text.word_count(),
        text.segments.len(),
        document.kind,
        document.name
    );
    Ok(text)
}
