// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod annotator;
pub mod config;
pub mod convert;
pub mod embedding;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod keywords;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod utils;

pub use annotator::{Annotated, Annotator};
pub use config::Config;
pub use convert::{ConverterBackend, OfficeConverter, PdfConverter, TypesetConverter};
pub use embedding::{EmbeddingBackend, EmbeddingProvider, HashedEmbedder, RemoteEmbedder};
pub use error::{FinderError, Result};
pub use exporter::{SearchReport, ViewerPage};
pub use extractor::extract_text;
pub use keywords::{KeyphraseExtractor, KeywordExtractor};
pub use matcher::{SimilarityMatcher, cosine_similarity};
pub use models::{Document, DocumentKind, ExtractedText, KeywordMatch, SearchHit};
pub use pipeline::{Finder, SessionStats, StageSpinner, UploadSummary};
pub use session::{KeywordBatch, LoadedDocument, Session};
pub use utils::{OperationTimer, Validator};

/// Finder wired with the backends selected in configuration.
pub type ConfiguredFinder = Finder<EmbeddingBackend, KeyphraseExtractor, ConverterBackend>;

impl ConfiguredFinder {
    pub fn from_config(config: Config) -> Result<Self> {
        let embedder = EmbeddingBackend::from_config(&config.embedding)?;
        let extractor = KeyphraseExtractor::new(&config.keywords);
        let converter = ConverterBackend::from_config(&config.conversion);
        Ok(Finder::new(config, embedder, extractor, converter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let finder = ConfiguredFinder::from_config(Config::default_config()).unwrap();
        assert_eq!(finder.config().matching.threshold, 0.70);
        let _session = Session::new();
    }
}
