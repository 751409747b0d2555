// file: src/session.rs
// description: per user interaction state holding the loaded document and its keyword batch
// reference: internal data structures

use crate::error::{FinderError, Result};
use crate::models::{Document, ExtractedText};
use tracing::debug;
use uuid::Uuid;

/// Keywords and their embeddings, built together and never updated piecemeal.
#[derive(Debug, Clone)]
pub struct KeywordBatch {
    keywords: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

impl KeywordBatch {
    pub fn new(keywords: Vec<String>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if keywords.len() != embeddings.len() {
            return Err(FinderError::Embedding(format!(
                "{} keywords but {} embeddings",
                keywords.len(),
                embeddings.len()
            )));
        }

        Ok(Self {
            keywords,
            embeddings,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,

    /// PDF used for highlighting; the upload itself for PDFs, the conversion for Word files
    pub paginated: Vec<u8>,

    pub text: ExtractedText,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    document: Option<LoadedDocument>,
    keywords: Option<KeywordBatch>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            document: None,
            keywords: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn clear(&mut self) {
        if let Some(loaded) = &self.document {
            debug!("Session {} releasing '{}'", self.id, loaded.document.name);
        }
        self.document = None;
        self.keywords = None;
    }

    /// Replaces the current document; any cached keywords belong to the old one and are dropped.
    pub fn load(&mut self, loaded: LoadedDocument) {
        self.clear();
        self.document = Some(loaded);
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub fn keyword_batch(&self) -> Option<&KeywordBatch> {
        self.keywords.as_ref()
    }

    pub(crate) fn store_keywords(&mut self, batch: KeywordBatch) -> Result<&KeywordBatch> {
        if self.document.is_none() {
            return Err(FinderError::NoDocumentLoaded);
        }
        Ok(self.keywords.insert(batch))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(name: &str) -> LoadedDocument {
        let document = Document::new(name, b"%PDF-1.5".to_vec()).unwrap();
        LoadedDocument {
            paginated: document.bytes.clone(),
            document,
            text: ExtractedText::from_segments(
                crate::models::SegmentKind::Page,
                vec!["body".to_string()],
            ),
        }
    }

    #[test]
    fn test_batch_rejects_length_mismatch() {
        let result = KeywordBatch::new(vec!["a".into(), "b".into()], vec![vec![1.0]]);
        assert!(matches!(result, Err(FinderError::Embedding(_))));
    }

    #[test]
    fn test_batch_accessors() {
        let batch = KeywordBatch::new(vec!["alpha".into()], vec![vec![0.5, 0.5]]).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(!batch.is_empty());
        assert_eq!(batch.keywords(), ["alpha".to_string()]);
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(!session.has_document());
        assert!(session.keyword_batch().is_none());
    }

    #[test]
    fn test_load_drops_previous_keywords() {
        let mut session = Session::new();
        session.load(loaded("first.pdf"));
        session
            .store_keywords(KeywordBatch::new(vec!["old".into()], vec![vec![1.0]]).unwrap())
            .unwrap();

        session.load(loaded("second.pdf"));
        assert!(session.keyword_batch().is_none());
        assert_eq!(session.document().unwrap().document.name, "second.pdf");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = Session::new();
        let id = session.id();
        session.load(loaded("doc.pdf"));
        session
            .store_keywords(KeywordBatch::new(vec![], vec![]).unwrap())
            .unwrap();

        session.clear();
        assert!(!session.has_document());
        assert!(session.keyword_batch().is_none());
        assert_eq!(session.id(), id);
    }

    #[test]
    fn test_keywords_require_document() {
        let mut session = Session::new();
        let batch = KeywordBatch::new(vec![], vec![]).unwrap();
        assert!(matches!(
            session.store_keywords(batch),
            Err(FinderError::NoDocumentLoaded)
        ));
    }
}
