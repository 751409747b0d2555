// file: src/embedding/hashed.rs
// description: offline embedding by signed feature hashing of words and character trigrams
// reference: Weinberger et al. 2009, "Feature Hashing for Large Scale Multitask Learning"

use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::keywords::TOKEN;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic, model-free embedder. Identical strings map to identical
/// vectors; strings sharing words or spelling land close together.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimension: usize,
}

impl HashedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        let lowered = text.to_lowercase();

        for token in TOKEN.find_iter(&lowered) {
            let word = token.as_str();
            self.add_feature(&mut vector, "w", word, WORD_WEIGHT);

            let padded: Vec<char> = format!(" {} ", word).chars().collect();
            for trigram in padded.windows(3) {
                let trigram: String = trigram.iter().collect();
                self.add_feature(&mut vector, "c", &trigram, TRIGRAM_WEIGHT);
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }

    fn add_feature(&self, vector: &mut [f32], namespace: &str, feature: &str, weight: f32) {
        let hash = fnv1a(namespace.as_bytes(), feature.as_bytes());
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

fn fnv1a(namespace: &[u8], feature: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    namespace
        .iter()
        .chain(b":")
        .chain(feature)
        .fold(OFFSET, |hash, byte| (hash ^ *byte as u64).wrapping_mul(PRIME))
}

impl EmbeddingProvider for HashedEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
