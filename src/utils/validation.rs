// file: src/utils/validation.rs
// description: upload and query validation helpers
// reference: input validation patterns

use crate::error::{FinderError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            FinderError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(FinderError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_upload_size(size: usize, max_mb: usize) -> Result<()> {
        if size == 0 {
            return Err(FinderError::Validation("Uploaded file is empty".to_string()));
        }

        let limit = max_mb.saturating_mul(1024 * 1024);
        if size > limit {
            return Err(FinderError::Validation(format!(
                "Uploaded file is {} bytes, limit is {} MB",
                size, max_mb
            )));
        }

        Ok(())
    }

    /// Final path component of an upload name, so names never carry directories.
    pub fn upload_name(path: &Path) -> Result<String> {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                FinderError::Validation(format!("No file name in {}", path.display()))
            })
    }

    /// Trimmed query, or `None` when there is nothing to search for.
    pub fn normalize_query(query: &str) -> Option<String> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("report.pdf");
        fs::write(&file_path, "%PDF").unwrap();

        assert!(Validator::validate_file_path(&file_path).is_ok());
        assert!(Validator::validate_file_path(temp.path()).is_err());
        assert!(Validator::validate_file_path(Path::new("/nonexistent.pdf")).is_err());
    }

    #[test]
    fn test_validate_upload_size() {
        assert!(Validator::validate_upload_size(1024, 1).is_ok());
        assert!(Validator::validate_upload_size(0, 1).is_err());
        assert!(Validator::validate_upload_size(2 * 1024 * 1024, 1).is_err());
    }

    #[test]
    fn test_upload_name_strips_directories() {
        assert_eq!(
            Validator::upload_name(Path::new("/tmp/in/Report.PDF")).unwrap(),
            "Report.PDF"
        );
        assert!(Validator::upload_name(Path::new("/")).is_err());
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(
            Validator::normalize_query("  large datasets \n"),
            Some("large datasets".to_string())
        );
        assert_eq!(Validator::normalize_query(" \t "), None);
        assert_eq!(Validator::normalize_query(""), None);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("ééééé", 2), "éé...");
    }
}
