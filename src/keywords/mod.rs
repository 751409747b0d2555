// file: src/keywords/mod.rs
// description: candidate keyword and keyphrase extraction
// reference: KeyBERT candidate generation (CountVectorizer n-grams, english stop words)

pub mod patterns;

pub use patterns::{STOP_WORDS, TOKEN, content_tokens, is_stop_word};

use crate::config::KeywordConfig;
use crate::error::Result;
use std::collections::HashMap;
use tracing::debug;

/// Produces the candidate keywords of a document text.
///
/// Output must be de-duplicated and deterministic for a given text; an empty
/// list is a valid answer for text-free input.
pub trait KeywordExtractor {
    fn extract(&self, text: &str) -> Result<Vec<String>>;
}

/// N-gram keyphrases over the stop-word-free token stream, most frequent first.
#[derive(Debug, Clone)]
pub struct KeyphraseExtractor {
    ngram_min: usize,
    ngram_max: usize,
    top_n: Option<usize>,
}

struct Candidate {
    first_seen: usize,
    count: usize,
}

impl KeyphraseExtractor {
    pub fn new(config: &KeywordConfig) -> Self {
        Self {
            ngram_min: config.ngram_min.max(1),
            ngram_max: config.ngram_max.max(config.ngram_min.max(1)),
            top_n: config.top_n,
        }
    }
}

impl KeywordExtractor for KeyphraseExtractor {
    fn extract(&self, text: &str) -> Result<Vec<String>> {
        let tokens = content_tokens(text);
        let mut candidates: HashMap<String, Candidate> = HashMap::new();
        let mut order = 0;

        for start in 0..tokens.len() {
            for n in self.ngram_min..=self.ngram_max {
                if start + n > tokens.len() {
                    break;
                }
                let phrase = tokens[start..start + n].join(" ");
                candidates
                    .entry(phrase)
                    .and_modify(|c| c.count += 1)
                    .or_insert_with(|| {
                        order += 1;
                        Candidate {
                            first_seen: order,
                            count: 1,
                        }
                    });
            }
        }

        let mut ranked: Vec<(String, Candidate)> = candidates.into_iter().collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });

        let limit = self.top_n.unwrap_or(ranked.len());
        let keywords: Vec<String> = ranked
            .into_iter()
            .take(limit)
            .map(|(phrase, _)| phrase)
            .collect();

        debug!(
            "Extracted {} keyword(s) from {} content token(s)",
            keywords.len(),
            tokens.len()
        );
        Ok(keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;

    fn extractor() -> KeyphraseExtractor {
        KeyphraseExtractor::new(&Config::default_config().keywords)
    }

    #[test]
    fn test_bigram_candidates() {
        let keywords = extractor()
            .extract("machine learning models require large datasets")
            .unwrap();

        assert!(keywords.contains(&"large datasets".to_string()));
        assert!(keywords.contains(&"machine learning".to_string()));
        assert!(keywords.contains(&"datasets".to_string()));
    }

    #[test]
    fn test_frequency_then_first_occurrence() {
        let keywords = extractor().extract("beta alpha beta").unwrap();
        assert_eq!(keywords, vec!["beta", "beta alpha", "alpha", "alpha beta"]);
    }

    #[test]
    fn test_unique_and_deterministic() {
        let text = "data pipelines move data; data pipelines break";
        let first = extractor().extract(text).unwrap();
        let second = extractor().extract(text).unwrap();

        assert_eq!(first, second);
        let mut deduped = first.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), first.len());
    }

    #[test]
    fn test_top_n_caps_candidates() {
        let mut config = Config::default_config().keywords;
        config.top_n = Some(2);
        let keywords = KeyphraseExtractor::new(&config)
            .extract("one two three four five")
            .unwrap();
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn test_degenerate_text_yields_nothing() {
        assert!(extractor().extract("").unwrap().is_empty());
        assert!(extractor().extract("a I . , the of").unwrap().is_empty());
    }
}
