// file: src/exporter/report.rs
// description: json summary of one search for auditing and scripting

use crate::error::Result;
use crate::exporter::write_bytes;
use crate::models::{Document, DocumentKind, SearchHit};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub content_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub generated_at: String,
    pub document: ReportDocument,
    pub query: String,
    pub keyword: String,
    pub similarity: f32,
    pub pages: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl SearchReport {
    pub fn new(document: &Document, hit: &SearchHit, output: Option<&Path>) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            document: ReportDocument {
                name: document.name.clone(),
                kind: document.kind,
                content_hash: document.content_hash.clone(),
            },
            query: hit.query.clone(),
            keyword: hit.keyword_match.keyword.clone(),
            similarity: hit.keyword_match.similarity,
            pages: hit.pages.clone(),
            output: output.map(|p| p.display().to_string()),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn write(&self, path: &Path, pretty: bool) -> Result<()> {
        write_bytes(path, self.to_json(pretty)?.as_bytes())?;
        info!("Wrote search report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeywordMatch;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn hit() -> SearchHit {
        SearchHit {
            query: "large datasets".to_string(),
            keyword_match: KeywordMatch::new("large datasets".to_string(), 3, 0.98),
            pages: vec![1, 4],
            pdf: b"%PDF".to_vec(),
        }
    }

    #[test]
    fn test_report_fields() {
        let document = Document::new("paper.pdf", b"%PDF-1.5".to_vec()).unwrap();
        let report = SearchReport::new(&document, &hit(), Some(Path::new("out.pdf")));

        assert_eq!(report.document.kind, DocumentKind::Pdf);
        assert_eq!(report.document.content_hash, document.content_hash);
        assert_eq!(report.pages, vec![1, 4]);
        assert_eq!(report.output.as_deref(), Some("out.pdf"));
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
    }

    #[test]
    fn test_report_written_as_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let document = Document::new("paper.pdf", b"%PDF-1.5".to_vec()).unwrap();
        let report = SearchReport::new(&document, &hit(), None);

        report.write(&path, true).unwrap();
        let parsed: SearchReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, report);

        let raw = report.to_json(false).unwrap();
        assert!(!raw.contains("\"output\""));
        assert!(raw.contains("\"kind\":\"pdf\""));
    }
}
