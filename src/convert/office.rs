// file: src/convert/office.rs
// description: Word to PDF conversion through a headless office suite
// reference: https://help.libreoffice.org/latest/en-US/text/shared/guide/start_parameters.html

use crate::convert::PdfConverter;
use crate::error::{FinderError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info};

/// Runs `<program> --headless --convert-to pdf --outdir <scratch> <input>`.
///
/// Input and output live in a scratch directory that is removed when the
/// call returns, whatever the outcome.
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    program: PathBuf,
    scratch_root: Option<PathBuf>,
}

impl OfficeConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            scratch_root: None,
        }
    }

    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    fn scratch_dir(&self) -> Result<TempDir> {
        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("smart-finder-");
            builder
        };

        let dir = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };

        dir.map_err(|e| FinderError::ConversionFailed(format!("cannot create scratch dir: {}", e)))
    }

    fn run(&self, scratch: &Path, input: &Path) -> Result<Vec<u8>> {
        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(scratch)
            .arg(input)
            .output()
            .map_err(|e| {
                FinderError::ConversionFailed(format!(
                    "cannot run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(FinderError::ConversionFailed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let produced = input.with_extension("pdf");
        fs::read(&produced).map_err(|e| {
            FinderError::ConversionFailed(format!(
                "expected output {} was not produced: {}",
                produced.display(),
                e
            ))
        })
    }
}

impl PdfConverter for OfficeConverter {
    fn convert(&self, name: &str, bytes: &[u8]) -> Result<Vec<u8>> {
        let scratch = self.scratch_dir()?;

        let file_name = Path::new(name)
            .file_name()
            .map(|f| f.to_os_string())
            .unwrap_or_else(|| "upload.docx".into());
        let input = scratch.path().join(file_name);

        fs::write(&input, bytes).map_err(|e| {
            FinderError::ConversionFailed(format!("cannot stage {}: {}", input.display(), e))
        })?;
        debug!("Staged {} for conversion", input.display());

        let result = self.run(scratch.path(), &input);

        let location = scratch.path().display().to_string();
        scratch.close().map_err(|e| {
            FinderError::ConversionFailed(format!("cannot remove scratch dir {}: {}", location, e))
        })?;

        let pdf = result?;
        info!("Converted {} to PDF ({} bytes)", name, pdf.len());
        Ok(pdf)
    }
}
