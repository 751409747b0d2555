// file: src/exporter/mod.rs
// description: writes highlighted PDFs, search reports and viewer pages
// reference: internal module structure

pub mod report;
pub mod viewer;

pub use report::{ReportDocument, SearchReport};
pub use viewer::ViewerPage;

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// `<dir>/<stem>.highlighted.pdf` next to the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    input.with_file_name(format!("{}.highlighted.pdf", stem))
}

pub fn write_pdf(path: &Path, pdf: &[u8]) -> Result<()> {
    write_bytes(path, pdf)?;
    info!("Wrote highlighted PDF to {}", path.display());
    Ok(())
}

pub(crate) fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/paper.docx")),
            PathBuf::from("/data/paper.highlighted.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("scan.pdf")),
            PathBuf::from("scan.highlighted.pdf")
        );
    }

    #[test]
    fn test_write_pdf_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/nested/result.pdf");

        write_pdf(&path, b"%PDF-1.5").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.5");
    }
}
