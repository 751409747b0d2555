// file: src/convert/mod.rs
// description: Word to paginated PDF conversion backends
// reference: internal module structure

pub mod office;
pub mod typeset;

pub use office::OfficeConverter;
pub use typeset::Typesetter;

use crate::config::{ConversionBackendKind, ConversionConfig};
use crate::error::{FinderError, Result};
use crate::extractor::word::docx_paragraphs;
use crate::models::DocumentKind;

/// Turns a Word upload into a PDF the annotator can search page by page.
pub trait PdfConverter {
    fn convert(&self, name: &str, bytes: &[u8]) -> Result<Vec<u8>>;
}

/// Typesets `.docx` paragraphs without any external program.
#[derive(Debug, Clone, Default)]
pub struct TypesetConverter {
    typesetter: Typesetter,
}

impl PdfConverter for TypesetConverter {
    fn convert(&self, name: &str, bytes: &[u8]) -> Result<Vec<u8>> {
        if DocumentKind::from_name(name)? != DocumentKind::Docx {
            return Err(FinderError::ConversionFailed(format!(
                "{} is not a .docx file; legacy .doc needs the office backend",
                name
            )));
        }

        let paragraphs = docx_paragraphs(bytes)
            .map_err(|e| FinderError::ConversionFailed(e.to_string()))?;
        self.typesetter.render(&paragraphs)
    }
}

pub enum ConverterBackend {
    Typeset(TypesetConverter),
    Office(OfficeConverter),
}

impl ConverterBackend {
    pub fn from_config(config: &ConversionConfig) -> Self {
        match config.backend {
            ConversionBackendKind::Typeset => Self::Typeset(TypesetConverter::default()),
            ConversionBackendKind::Office => {
                let converter = OfficeConverter::new(&config.office_program);
                Self::Office(match &config.scratch_dir {
                    Some(root) => converter.with_scratch_root(root),
                    None => converter,
                })
            }
        }
    }
}

impl PdfConverter for ConverterBackend {
    fn convert(&self, name: &str, bytes: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Typeset(converter) => converter.convert(name, bytes),
            Self::Office(converter) => converter.convert(name, bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_typeset_rejects_legacy_doc() {
        let err = TypesetConverter::default()
            .convert("old.doc", b"\xd0\xcf\x11\xe0")
            .unwrap_err();
        assert!(matches!(err, FinderError::ConversionFailed(_)));
    }

    #[test]
    fn test_typeset_rejects_corrupt_docx() {
        let err = TypesetConverter::default()
            .convert("broken.docx", b"not a zip archive")
            .unwrap_err();
        assert!(matches!(err, FinderError::ConversionFailed(_)));
    }

    #[test]
    fn test_backend_from_config() {
        let mut config = Config::default_config();
        assert!(matches!(
            ConverterBackend::from_config(&config.conversion),
            ConverterBackend::Typeset(_)
        ));

        config.conversion.backend = ConversionBackendKind::Office;
        assert!(matches!(
            ConverterBackend::from_config(&config.conversion),
            ConverterBackend::Office(_)
        ));
    }
}
