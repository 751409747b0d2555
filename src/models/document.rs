// file: src/models/document.rs
// description: uploaded document model with format detection and content identity
// reference: internal data structures

use crate::error::{FinderError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
}

impl DocumentKind {
    pub fn from_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("docx") => Ok(Self::Docx),
            Some("doc") => Ok(Self::Doc),
            Some(other) => Err(FinderError::UnsupportedFormat(format!(".{}", other))),
            None => Err(FinderError::UnsupportedFormat(format!(
                "'{}' (no extension)",
                name
            ))),
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Self::Docx | Self::Doc)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Raw upload. Immutable; a new upload replaces it wholesale.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
    pub content_hash: String,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let kind = DocumentKind::from_name(&name)?;
        let content_hash = Self::compute_hash(&bytes);

        Ok(Self {
            name,
            kind,
            bytes,
            content_hash,
        })
    }

    fn compute_hash(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
