// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{FinderError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub keywords: KeywordConfig,
    pub matching: MatchingConfig,
    pub annotation: AnnotationConfig,
    pub conversion: ConversionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackendKind {
    Hashed,
    Remote,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackendKind,
    pub dimension: usize,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Send `dimensions` with remote requests; models without shortening support reject it.
    #[serde(default = "default_send_dimensions")]
    pub send_dimensions: bool,
    /// Keywords per remote request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_send_dimensions() -> bool {
    true
}

fn default_batch_size() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeywordConfig {
    pub ngram_min: usize,
    pub ngram_max: usize,
    /// Upper bound on candidates kept; `None` keeps every candidate.
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// A keyword matches only when its similarity is strictly above this value.
    pub threshold: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnnotationConfig {
    pub color: [f32; 3],
    pub opacity: f32,
    pub normalize_search: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionBackendKind {
    Typeset,
    Office,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionConfig {
    pub backend: ConversionBackendKind,
    pub office_program: PathBuf,
    /// Parent directory for scratch dirs; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub viewer_zoom: u32,
    pub max_upload_mb: usize,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SMART_FINDER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| FinderError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| FinderError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            embedding: EmbeddingConfig {
                backend: EmbeddingBackendKind::Hashed,
                dimension: 384,
                endpoint: "https://api.openai.com/v1/embeddings".to_string(),
                model: "text-embedding-3-small".to_string(),
                api_key: None,
                timeout_secs: 30,
                send_dimensions: default_send_dimensions(),
                batch_size: default_batch_size(),
            },
            keywords: KeywordConfig {
                ngram_min: 1,
                ngram_max: 2,
                top_n: None,
            },
            matching: MatchingConfig { threshold: 0.70 },
            annotation: AnnotationConfig {
                color: [1.0, 1.0, 0.0],
                opacity: 0.4,
                normalize_search: true,
            },
            conversion: ConversionConfig {
                backend: ConversionBackendKind::Typeset,
                office_program: PathBuf::from("soffice"),
                scratch_dir: None,
            },
            output: OutputConfig {
                viewer_zoom: 90,
                max_upload_mb: 50,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding.dimension == 0 {
            return Err(FinderError::Config(
                "embedding.dimension must be greater than 0".to_string(),
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(FinderError::Config(
                "embedding.batch_size must be greater than 0".to_string(),
            ));
        }

        if self.embedding.backend == EmbeddingBackendKind::Remote
            && !self.embedding.endpoint.starts_with("http")
        {
            return Err(FinderError::Config(format!(
                "embedding.endpoint is not an http(s) url: {}",
                self.embedding.endpoint
            )));
        }

        if self.keywords.ngram_min == 0 || self.keywords.ngram_min > self.keywords.ngram_max {
            return Err(FinderError::Config(format!(
                "invalid keyword n-gram range {}..={}",
                self.keywords.ngram_min, self.keywords.ngram_max
            )));
        }

        if !(-1.0..1.0).contains(&self.matching.threshold) {
            return Err(FinderError::Config(format!(
                "matching.threshold must be within [-1, 1), got {}",
                self.matching.threshold
            )));
        }

        let unit = 0.0..=1.0;
        if !unit.contains(&self.annotation.opacity)
            || !self.annotation.color.iter().all(|c| unit.contains(c))
        {
            return Err(FinderError::Config(
                "annotation color and opacity components must be within [0, 1]".to_string(),
            ));
        }

        if self.output.max_upload_mb == 0 {
            return Err(FinderError::Config(
                "output.max_upload_mb must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
