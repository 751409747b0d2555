// file: src/annotator/mod.rs
// description: highlights every literal occurrence of a keyword in a PDF
// reference: PDF 32000-1:2008 section 12.5.6.10 (text markup annotations)

pub mod fonts;
pub mod layout;
pub mod search;

pub use layout::{Glyph, Rect, layout_page};
pub use search::{SearchMode, TextSearcher};

use crate::config::AnnotationConfig;
use crate::error::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary, text_string};
use tracing::{debug, info};

/// Highlighted PDF and the ascending, duplicate-free 1-based pages that matched.
#[derive(Debug, Clone)]
pub struct Annotated {
    pub pdf: Vec<u8>,
    pub pages: Vec<u32>,
    pub occurrences: usize,
}

pub struct Annotator {
    color: [f32; 3],
    opacity: f32,
    searcher: TextSearcher,
}

impl Annotator {
    pub fn new(config: &AnnotationConfig) -> Self {
        let mode = if config.normalize_search {
            SearchMode::Normalized
        } else {
            SearchMode::Exact
        };

        Self {
            color: config.color,
            opacity: config.opacity,
            searcher: TextSearcher::new(mode),
        }
    }

    pub fn annotate(&self, pdf: &[u8], keyword: &str) -> Result<Annotated> {
        let mut doc = Document::load_mem(pdf)?;
        let mut pages = Vec::new();
        let mut occurrences = 0;

        for (page_number, page_id) in doc.get_pages() {
            let glyphs = layout_page(&doc, page_id)?;
            let found = self.searcher.find(&glyphs, keyword);
            if found.is_empty() {
                continue;
            }

            debug!(
                "Page {}: {} occurrence(s) of '{}'",
                page_number,
                found.len(),
                keyword
            );

            let highlights: Vec<Object> = found
                .iter()
                .flatten()
                .map(|rect| {
                    let annotation = self.highlight(page_id, rect, keyword);
                    Object::Reference(doc.add_object(annotation))
                })
                .collect();

            attach_annotations(&mut doc, page_id, highlights)?;
            occurrences += found.len();
            pages.push(page_number);
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;

        info!(
            "Highlighted {} occurrence(s) of '{}' on {} page(s)",
            occurrences,
            keyword,
            pages.len()
        );

        Ok(Annotated {
            pdf: buffer,
            pages,
            occurrences,
        })
    }

    fn highlight(&self, page_id: ObjectId, rect: &Rect, keyword: &str) -> Dictionary {
        let [r, g, b] = self.color;
        let quad: Vec<Object> = [
            rect.x0, rect.y1, rect.x1, rect.y1, rect.x0, rect.y0, rect.x1, rect.y0,
        ]
        .into_iter()
        .map(Object::from)
        .collect();

        dictionary! {
            "Type" => "Annot",
            "Subtype" => "Highlight",
            "Rect" => vec![rect.x0.into(), rect.y0.into(), rect.x1.into(), rect.y1.into()],
            "QuadPoints" => quad,
            "C" => vec![r.into(), g.into(), b.into()],
            "CA" => self.opacity,
            "F" => 4i64,
            "P" => page_id,
            "Contents" => text_string(keyword),
        }
    }
}

/// Append to the page's `/Annots`, whether inline or referenced.
fn attach_annotations(doc: &mut Document, page_id: ObjectId, highlights: Vec<Object>) -> Result<()> {
    let existing = {
        let page = doc.get_dictionary(page_id)?;
        match page.get(b"Annots") {
            Ok(Object::Array(items)) => items.clone(),
            Ok(Object::Reference(id)) => doc
                .get_object(*id)
                .and_then(Object::as_array)
                .cloned()
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    };

    let mut annots = existing;
    annots.extend(highlights);

    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)?
        .set("Annots", annots);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::annotator::layout::tests::identity_h_pdf;
    use crate::convert::typeset::Typesetter;
    use crate::extractor::pdf::extract_pdf;
    use pretty_assertions::assert_eq;

    fn annotator() -> Annotator {
        Annotator::new(&Config::default_config().annotation)
    }

    fn pdf(pages: &[&[&str]]) -> Vec<u8> {
        let pages: Vec<Vec<String>> = pages
            .iter()
            .map(|p| p.iter().map(|s| s.to_string()).collect())
            .collect();
        Typesetter::default().render_pages(&pages).unwrap()
    }

    fn highlight_count(bytes: &[u8], page: u32) -> usize {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = *doc.get_pages().get(&page).unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        match page.get(b"Annots") {
            Ok(Object::Array(items)) => items
                .iter()
                .filter(|item| {
                    let id = item.as_reference().unwrap();
                    let annot = doc.get_dictionary(id).unwrap();
                    annot.get(b"Subtype").unwrap().as_name().unwrap() == b"Highlight"
                })
                .count(),
            _ => 0,
        }
    }

    #[test]
    fn test_pages_listed_once_in_order() {
        let source = pdf(&[
            &["large datasets and more large datasets"],
            &["nothing relevant here"],
            &["large datasets again"],
        ]);

        let annotated = annotator().annotate(&source, "large datasets").unwrap();
        assert_eq!(annotated.pages, vec![1, 3]);
        assert_eq!(annotated.occurrences, 3);
        assert_eq!(highlight_count(&annotated.pdf, 1), 2);
        assert_eq!(highlight_count(&annotated.pdf, 2), 0);
        assert_eq!(highlight_count(&annotated.pdf, 3), 1);
    }

    #[test]
    fn test_absent_keyword_yields_empty_page_list() {
        let source = pdf(&[&["machine learning models"]]);
        let annotated = annotator().annotate(&source, "quantum chemistry").unwrap();
        assert!(annotated.pages.is_empty());
        assert_eq!(annotated.occurrences, 0);
    }

    #[test]
    fn test_highlight_uses_configured_color_and_opacity() {
        let source = pdf(&[&["yellow marker"]]);
        let annotated = annotator().annotate(&source, "marker").unwrap();

        let doc = Document::load_mem(&annotated.pdf).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let annots = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Annots")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        let annot = doc.get_dictionary(annots[0].as_reference().unwrap()).unwrap();

        let color = annot.get(b"C").unwrap().as_array().unwrap();
        assert_eq!(color.len(), 3);
        assert_eq!(annot.get(b"QuadPoints").unwrap().as_array().unwrap().len(), 8);
        assert!(annot.get(b"CA").is_ok());
    }

    #[test]
    fn test_annotation_preserves_text() {
        let source = pdf(&[
            &["machine learning models require large datasets"],
            &["second page text"],
        ]);
        let annotated = annotator().annotate(&source, "large datasets").unwrap();

        assert_eq!(
            extract_pdf(&source).unwrap(),
            extract_pdf(&annotated.pdf).unwrap()
        );
    }

    #[test]
    fn test_annotating_twice_keeps_existing_annotations() {
        let source = pdf(&[&["alpha beta"]]);
        let once = annotator().annotate(&source, "alpha").unwrap();
        let twice = annotator().annotate(&once.pdf, "beta").unwrap();
        assert_eq!(highlight_count(&twice.pdf, 1), 2);
    }

    #[test]
    fn test_composite_font_occurrences_are_highlighted() {
        let source = identity_h_pdf(&[
            "machine learning models require large datasets",
            "large datasets again",
        ]);
        let annotated = annotator().annotate(&source, "large datasets").unwrap();

        assert_eq!(annotated.pages, vec![1]);
        assert_eq!(annotated.occurrences, 2);
        assert_eq!(highlight_count(&annotated.pdf, 1), 2);
    }

    #[test]
    fn test_non_latin_keyword_is_highlighted() {
        let source = pdf(&[&["машинное обучение требует данных"]]);
        let annotated = annotator().annotate(&source, "машинное обучение").unwrap();

        assert_eq!(annotated.pages, vec![1]);
        assert_eq!(annotated.occurrences, 1);
    }

    #[test]
    fn test_invalid_pdf_is_an_error() {
        assert!(annotator().annotate(b"not a pdf", "anything").is_err());
    }
}
