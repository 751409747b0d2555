// file: src/embedding/mod.rs
// description: embedding provider abstraction and configured backends
// reference: internal module structure

pub mod hashed;
pub mod remote;

pub use hashed::HashedEmbedder;
pub use remote::RemoteEmbedder;

use crate::config::{EmbeddingBackendKind, EmbeddingConfig};
use crate::error::{FinderError, Result};
use std::future::Future;

/// Maps text into a fixed-length vector space.
///
/// Keywords and queries must go through the same provider for their
/// similarities to mean anything.
pub trait EmbeddingProvider {
    fn dimension(&self) -> usize;

    fn embed_batch(&self, texts: &[String]) -> impl Future<Output = Result<Vec<Vec<f32>>>>;

    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> {
        let texts = vec![text.to_string()];
        async move {
            self.embed_batch(&texts)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| FinderError::Embedding("provider returned no vector".to_string()))
        }
    }
}

pub enum EmbeddingBackend {
    Hashed(HashedEmbedder),
    Remote(RemoteEmbedder),
}

impl EmbeddingBackend {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        match config.backend {
            EmbeddingBackendKind::Hashed => Ok(Self::Hashed(HashedEmbedder::new(config.dimension))),
            EmbeddingBackendKind::Remote => Ok(Self::Remote(RemoteEmbedder::from_config(config)?)),
        }
    }
}

impl EmbeddingProvider for EmbeddingBackend {
    fn dimension(&self) -> usize {
        match self {
            Self::Hashed(embedder) => embedder.dimension(),
            Self::Remote(embedder) => embedder.dimension(),
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self {
            Self::Hashed(embedder) => embedder.embed_batch(texts).await,
            Self::Remote(embedder) => embedder.embed_batch(texts).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_default_embed_uses_batch() {
        let backend = EmbeddingBackend::from_config(&Config::default_config().embedding).unwrap();
        let single = backend.embed("large datasets").await.unwrap();
        let batch = backend
            .embed_batch(&["large datasets".to_string()])
            .await
            .unwrap();

        assert_eq!(single.len(), backend.dimension());
        assert_eq!(vec![single], batch);
    }
}
