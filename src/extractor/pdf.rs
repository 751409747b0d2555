// file: src/extractor/pdf.rs
// description: page text extraction from PDF files
// reference: https://docs.rs/lopdf

use crate::error::Result;
use crate::models::{ExtractedText, SegmentKind};
use lopdf::Document;

/// One segment per page, in page order.
pub fn extract_pdf(bytes: &[u8]) -> Result<ExtractedText> {
    let doc = Document::load_mem(bytes)?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        pages.push(doc.extract_text(&[*page_number])?);
    }

    Ok(ExtractedText::from_segments(SegmentKind::Page, pages))
}
