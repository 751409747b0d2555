// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FinderError>;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("{0} is not supported. Upload either a PDF or a Word document")]
    UnsupportedFormat(String),

    #[error("No keywords could be extracted from the document")]
    NoKeywordsAvailable,

    #[error("Word to PDF conversion failed: {0}")]
    ConversionFailed(String),

    #[error(
        "The document does not contain words above {:.0}% similarity (best: {:.4})",
        .threshold * 100.0,
        .best_similarity
    )]
    NoConfidentMatch { best_similarity: f32, threshold: f32 },

    #[error("'{keyword}' was selected but does not occur literally in the document")]
    MatchedButNotFound { keyword: String, similarity: f32 },

    #[error("No document has been uploaded")]
    NoDocumentLoaded,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Word document error: {0}")]
    Word(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FinderError {
    /// Outcomes a user can act on; the session stays usable after any of them.
    pub fn is_recoverable_outcome(&self) -> bool {
        matches!(
            self,
            FinderError::UnsupportedFormat(_)
                | FinderError::NoKeywordsAvailable
                | FinderError::ConversionFailed(_)
                | FinderError::NoConfidentMatch { .. }
                | FinderError::MatchedButNotFound { .. }
                | FinderError::NoDocumentLoaded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classification() {
        assert!(FinderError::NoKeywordsAvailable.is_recoverable_outcome());
        assert!(
            FinderError::NoConfidentMatch {
                best_similarity: 0.5,
                threshold: 0.7
            }
            .is_recoverable_outcome()
        );
        assert!(!FinderError::Embedding("timeout".to_string()).is_recoverable_outcome());
        assert!(!FinderError::Validation("empty".to_string()).is_recoverable_outcome());
    }

    #[test]
    fn test_no_confident_match_message() {
        let err = FinderError::NoConfidentMatch {
            best_similarity: 0.5123,
            threshold: 0.7,
        };
        let message = err.to_string();
        assert!(message.contains("0.5123"));
        assert!(message.contains("70%"));
    }
}
