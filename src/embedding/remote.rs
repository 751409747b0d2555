// file: src/embedding/remote.rs
// description: OpenAI compatible embeddings API client
// reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::config::EmbeddingConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{FinderError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

pub struct RemoteEmbedder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
    send_dimensions: bool,
    batch_size: usize,
}

impl RemoteEmbedder {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FinderError::Embedding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimension: config.dimension,
            send_dimensions: config.send_dimensions,
            batch_size: config.batch_size.max(1),
        })
    }

    fn request_body<'a>(&'a self, texts: &'a [String]) -> EmbeddingRequest<'a> {
        EmbeddingRequest {
            input: texts,
            model: &self.model,
            dimensions: self.send_dimensions.then_some(self.dimension),
        }
    }

    /// Restore request order and check every vector has the configured length.
    fn collect_vectors(&self, expected: usize, mut data: Vec<EmbeddingData>) -> Result<Vec<Vec<f32>>> {
        if data.len() != expected {
            return Err(FinderError::Embedding(format!(
                "Requested {} embeddings, received {}",
                expected,
                data.len()
            )));
        }

        if data.iter().all(|d| d.index.is_some()) {
            data.sort_by_key(|d| d.index);
        }

        data.into_iter()
            .map(|d| {
                if d.embedding.len() == self.dimension {
                    Ok(d.embedding)
                } else {
                    Err(FinderError::Embedding(format!(
                        "Embedding API returned dimension {}, expected {}",
                        d.embedding.len(),
                        self.dimension
                    )))
                }
            })
            .collect()
    }
}

impl EmbeddingProvider for RemoteEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        embed_chunked(texts, self.batch_size, |chunk| self.request(chunk)).await
    }
}

impl RemoteEmbedder {
    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(
            "Requesting {} embedding(s) from {}",
            texts.len(),
            self.endpoint
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&self.request_body(texts));
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await.map_err(|e| {
            FinderError::Embedding(format!("Failed to send embedding request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FinderError::Embedding(format!(
                "Embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            FinderError::Embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        self.collect_vectors(texts.len(), embedding_response.data)
    }
}

/// Embed `texts` at most `batch_size` per request, keeping input order.
async fn embed_chunked<'t, F, Fut>(
    texts: &'t [String],
    batch_size: usize,
    mut request: F,
) -> Result<Vec<Vec<f32>>>
where
    F: FnMut(&'t [String]) -> Fut,
    Fut: Future<Output = Result<Vec<Vec<f32>>>>,
{
    let mut vectors = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(batch_size.max(1)) {
        vectors.extend(request(chunk).await?);
    }
    Ok(vectors)
}
