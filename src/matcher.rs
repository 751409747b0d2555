// file: src/matcher.rs
// description: threshold gated nearest keyword selection by cosine similarity
// reference: https://en.wikipedia.org/wiki/Cosine_similarity

use crate::error::{FinderError, Result};
use crate::models::KeywordMatch;
use crate::session::KeywordBatch;
use tracing::debug;

/// Zero-magnitude inputs have similarity 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

pub struct SimilarityMatcher {
    threshold: f32,
}

impl SimilarityMatcher {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn accepts(&self, similarity: f32) -> bool {
        similarity > self.threshold
    }

    /// Index and score of the most similar vector; the lowest index wins ties.
    pub fn nearest(&self, query: &[f32], vectors: &[Vec<f32>]) -> Result<Option<(usize, f32)>> {
        let mut best: Option<(usize, f32)> = None;

        for (index, vector) in vectors.iter().enumerate() {
            if vector.len() != query.len() {
                return Err(FinderError::Embedding(format!(
                    "Query has dimension {} but keyword {} has dimension {}",
                    query.len(),
                    index,
                    vector.len()
                )));
            }

            let similarity = cosine_similarity(query, vector);
            match best {
                Some((_, top)) if similarity <= top => {}
                _ => best = Some((index, similarity)),
            }
        }

        Ok(best)
    }

    /// A keyword is selected only when its similarity is strictly above the threshold.
    pub fn best_match(&self, query: &[f32], batch: &KeywordBatch) -> Result<KeywordMatch> {
        let (index, similarity) = self
            .nearest(query, batch.embeddings())?
            .ok_or(FinderError::NoKeywordsAvailable)?;

        let keyword = &batch.keywords()[index];
        debug!(
            "Nearest keyword '{}' at index {} with similarity {:.4}",
            keyword, index, similarity
        );

        if self.accepts(similarity) {
            Ok(KeywordMatch::new(keyword.clone(), index, similarity))
        } else {
            Err(FinderError::NoConfidentMatch {
                best_similarity: similarity,
                threshold: self.threshold,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn batch(entries: &[(&str, Vec<f32>)]) -> KeywordBatch {
        KeywordBatch::new(
            entries.iter().map(|(k, _)| k.to_string()).collect(),
            entries.iter().map(|(_, v)| v.clone()).collect(),
        )
        .unwrap()
    }

    /// Unit vector whose cosine similarity with [1, 0] is `similarity`.
    fn at_similarity(similarity: f32) -> Vec<f32> {
        vec![similarity, (1.0 - similarity * similarity).sqrt()]
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let matcher = SimilarityMatcher::new(0.70);
        assert!(!matcher.accepts(0.70));
        assert!(matcher.accepts(0.70001));
        assert!(!matcher.accepts(0.69));
    }

    #[test]
    fn test_score_just_above_threshold_matches() {
        let matcher = SimilarityMatcher::new(0.70);
        let keywords = batch(&[("near", at_similarity(0.75)), ("far", vec![0.0, 1.0])]);

        let found = matcher.best_match(&[1.0, 0.0], &keywords).unwrap();
        assert_eq!(found.keyword, "near");
        assert!((found.similarity - 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_score_below_threshold_is_rejected() {
        let matcher = SimilarityMatcher::new(0.70);
        let keywords = batch(&[("weak", at_similarity(0.65))]);
        assert!(matches!(
            matcher.best_match(&[1.0, 0.0], &keywords),
            Err(FinderError::NoConfidentMatch { .. })
        ));
    }

    #[test]
    fn test_ties_pick_lowest_index() {
        let matcher = SimilarityMatcher::new(0.5);
        let keywords = batch(&[
            ("first", vec![1.0, 0.0]),
            ("second", vec![2.0, 0.0]),
            ("third", vec![0.0, 1.0]),
        ]);

        let found = matcher.best_match(&[3.0, 0.0], &keywords).unwrap();
        assert_eq!(found.keyword, "first");
        assert_eq!(found.index, 0);
    }

    #[test]
    fn test_best_match_over_index_zero() {
        let matcher = SimilarityMatcher::new(0.70);
        let keywords = batch(&[("zero", vec![0.0, 1.0]), ("one", vec![1.0, 0.1])]);

        let found = matcher.best_match(&[1.0, 0.0], &keywords).unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.keyword, "one");
    }

    #[test]
    fn test_no_confident_match_reports_best_score() {
        let matcher = SimilarityMatcher::new(0.70);
        let keywords = batch(&[("orthogonal", vec![0.0, 1.0])]);

        match matcher.best_match(&[1.0, 0.0], &keywords) {
            Err(FinderError::NoConfidentMatch {
                best_similarity,
                threshold,
            }) => {
                assert!(best_similarity.abs() < 1e-6);
                assert_eq!(threshold, 0.70);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_batch_is_no_keywords() {
        let matcher = SimilarityMatcher::new(0.70);
        let empty = KeywordBatch::new(vec![], vec![]).unwrap();
        assert!(matches!(
            matcher.best_match(&[1.0, 0.0], &empty),
            Err(FinderError::NoKeywordsAvailable)
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let matcher = SimilarityMatcher::new(0.70);
        let keywords = batch(&[("short", vec![1.0])]);
        assert!(matches!(
            matcher.best_match(&[1.0, 0.0], &keywords),
            Err(FinderError::Embedding(_))
        ));
    }
}
