// file: src/pipeline/finder.rs
// description: upload and search orchestration over injected extractor, embedder and converter
// reference: pipeline orchestration

use crate::annotator::Annotator;
use crate::config::Config;
use crate::convert::PdfConverter;
use crate::embedding::EmbeddingProvider;
use crate::error::{FinderError, Result};
use crate::extractor::extract_text;
use crate::keywords::KeywordExtractor;
use crate::matcher::SimilarityMatcher;
use crate::models::{Document, DocumentKind, SearchHit};
use crate::pipeline::progress::StageSpinner;
use crate::session::{KeywordBatch, LoadedDocument, Session};
use crate::utils::{OperationTimer, StageMetrics, Validator};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub name: String,
    pub kind: DocumentKind,
    pub content_hash: String,
    pub segments: usize,
    pub words: usize,
    pub keywords: usize,
    pub converted: bool,
    pub stages: Vec<StageMetrics>,
}

pub struct Finder<E, K, C> {
    config: Config,
    embedder: E,
    extractor: K,
    converter: C,
    matcher: SimilarityMatcher,
    annotator: Annotator,
    show_progress: bool,
}

impl<E, K, C> Finder<E, K, C>
where
    E: EmbeddingProvider,
    K: KeywordExtractor,
    C: PdfConverter,
{
    pub fn new(config: Config, embedder: E, extractor: K, converter: C) -> Self {
        let matcher = SimilarityMatcher::new(config.matching.threshold);
        let annotator = Annotator::new(&config.annotation);

        Self {
            config,
            embedder,
            extractor,
            converter,
            matcher,
            annotator,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the session's document with a new upload.
    ///
    /// The file type and size are checked before anything is touched, so a
    /// rejected upload keeps the previous document. Any later failure leaves
    /// the session empty.
    pub async fn upload(
        &self,
        session: &mut Session,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadSummary> {
        let document = Document::new(name, bytes)?;
        Validator::validate_upload_size(document.size(), self.config.output.max_upload_mb)?;

        session.clear();
        let result = self.preprocess(session, document).await;
        if let Err(e) = &result {
            warn!("Upload failed for session {}: {}", session.id(), e);
            session.clear();
        }
        result
    }

    async fn preprocess(&self, session: &mut Session, document: Document) -> Result<UploadSummary> {
        let timer = OperationTimer::new("Preprocessing document");
        let spinner = StageSpinner::new("Preprocessing document", self.show_progress);
        let mut stages = Vec::new();

        let converted = document.kind.is_word();
        let paginated = if converted {
            spinner.set_message("Converting to PDF");
            let started = Instant::now();
            let pdf = self.converter.convert(&document.name, &document.bytes)?;
            stages.push(StageMetrics::new("convert", 1, started.elapsed()));
            pdf
        } else {
            document.bytes.clone()
        };

        spinner.set_message("Extracting text");
        let started = Instant::now();
        let text = extract_text(&document, &paginated)?;
        stages.push(StageMetrics::new("extract", text.segments.len(), started.elapsed()));
        timer.checkpoint("text extracted");

        let mut summary = UploadSummary {
            name: document.name.clone(),
            kind: document.kind,
            content_hash: document.content_hash.clone(),
            segments: text.segments.len(),
            words: text.word_count(),
            keywords: 0,
            converted,
            stages,
        };

        session.load(LoadedDocument {
            document,
            paginated,
            text,
        });

        spinner.set_message("Extracting keywords");
        let started = Instant::now();
        summary.keywords = self.ensure_keywords(session).await?.len();
        summary
            .stages
            .push(StageMetrics::new("keywords", summary.keywords, started.elapsed()));

        spinner.finish();
        timer.finish_with_count(summary.keywords);
        Ok(summary)
    }

    /// The session's keyword batch, computed on first use for the loaded document.
    pub async fn ensure_keywords<'s>(&self, session: &'s mut Session) -> Result<&'s KeywordBatch> {
        let text = match session.document() {
            Some(loaded) => &loaded.text.text,
            None => return Err(FinderError::NoDocumentLoaded),
        };

        let cached = session.keyword_batch().is_some_and(|batch| !batch.is_empty());
        if !cached {
            let batch = self.compute_keywords(text).await?;
            info!(
                "Session {} cached {} keyword(s)",
                session.id(),
                batch.len()
            );
            session.store_keywords(batch)?;
        }

        session
            .keyword_batch()
            .ok_or(FinderError::NoKeywordsAvailable)
    }

    async fn compute_keywords(&self, text: &str) -> Result<KeywordBatch> {
        let keywords = self.extractor.extract(text)?;
        if keywords.is_empty() {
            debug!("Document text yielded no keyword candidates");
            return KeywordBatch::new(Vec::new(), Vec::new());
        }

        let embeddings = self.embedder.embed_batch(&keywords).await?;
        KeywordBatch::new(keywords, embeddings)
    }

    pub async fn keywords(&self, session: &mut Session) -> Result<Vec<String>> {
        Ok(self.ensure_keywords(session).await?.keywords().to_vec())
    }

    /// Highlight the keyword nearest to `query`.
    ///
    /// A blank query is not a search and yields `Ok(None)`.
    pub async fn search(&self, session: &mut Session, query: &str) -> Result<Option<SearchHit>> {
        let Some(query) = Validator::normalize_query(query) else {
            return Ok(None);
        };

        let timer = OperationTimer::new("Search");
        let spinner = StageSpinner::new("Searching", self.show_progress);

        let batch = self.ensure_keywords(session).await?;
        if batch.is_empty() {
            return Err(FinderError::NoKeywordsAvailable);
        }

        let query_vector = self.embedder.embed(&query).await?;
        let keyword_match = self.matcher.best_match(&query_vector, batch)?;
        info!(
            "Query '{}' matched keyword '{}' ({:.4})",
            query, keyword_match.keyword, keyword_match.similarity
        );

        let loaded = session.document().ok_or(FinderError::NoDocumentLoaded)?;
        spinner.set_message("Highlighting");
        let annotated = self.annotator.annotate(&loaded.paginated, &keyword_match.keyword)?;

        if annotated.pages.is_empty() {
            return Err(FinderError::MatchedButNotFound {
                keyword: keyword_match.keyword,
                similarity: keyword_match.similarity,
            });
        }

        spinner.finish();
        timer.finish_with_count(annotated.occurrences);

        Ok(Some(SearchHit {
            query,
            keyword_match,
            pages: annotated.pages,
            pdf: annotated.pdf,
        }))
    }
}
