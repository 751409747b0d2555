// file: src/extractor/word.rs
// description: paragraph text extraction from .docx files
// reference: https://docs.rs/docx-rust

use crate::error::{FinderError, Result};
use crate::models::{ExtractedText, SegmentKind};
use docx_rust::DocxFile;
use docx_rust::document::BodyContent;
use std::io::Cursor;

/// Top-level body paragraphs in document order, empty ones included.
pub fn docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>> {
    let file = DocxFile::from_reader(Cursor::new(bytes))
        .map_err(|e| FinderError::Word(format!("cannot open .docx archive: {:?}", e)))?;
    let docx = file
        .parse()
        .map_err(|e| FinderError::Word(format!("cannot parse .docx document: {:?}", e)))?;

    let mut paragraphs = Vec::new();
    for content in &docx.document.body.content {
        if let BodyContent::Paragraph(paragraph) = content {
            let mut text = String::new();
            for run in paragraph.iter_text() {
                text.push_str(run);
            }
            paragraphs.push(text);
        }
    }

    Ok(paragraphs)
}

pub fn extract_docx(bytes: &[u8]) -> Result<ExtractedText> {
    Ok(ExtractedText::from_segments(
        SegmentKind::Paragraph,
        docx_paragraphs(bytes)?,
    ))
}
