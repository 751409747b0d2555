// file: src/annotator/search.rs
// description: literal occurrence search over laid out glyphs
// reference: mirrors the case-insensitive page search of common PDF viewers

use crate::annotator::layout::{Glyph, Rect};

/// How keyword and page text are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Byte-for-byte character comparison.
    Exact,
    /// Lowercased, with whitespace runs collapsed to one space.
    Normalized,
}

pub struct TextSearcher {
    mode: SearchMode,
}

impl TextSearcher {
    pub fn new(mode: SearchMode) -> Self {
        Self { mode }
    }

    pub fn normalize(&self, text: &str) -> Vec<char> {
        let glyphs: Vec<Glyph> = text.chars().map(|ch| Glyph { ch, bbox: None }).collect();
        let (chars, _) = self.normalize_glyphs(&glyphs);
        trim(chars)
    }

    /// Returns the normalised characters and, for each, the index of its source glyph.
    fn normalize_glyphs(&self, glyphs: &[Glyph]) -> (Vec<char>, Vec<usize>) {
        let mut chars = Vec::with_capacity(glyphs.len());
        let mut sources = Vec::with_capacity(glyphs.len());

        for (index, glyph) in glyphs.iter().enumerate() {
            match self.mode {
                SearchMode::Exact => {
                    chars.push(glyph.ch);
                    sources.push(index);
                }
                SearchMode::Normalized => {
                    if glyph.ch.is_whitespace() {
                        if chars.last().is_some_and(|c: &char| *c == ' ') {
                            continue;
                        }
                        chars.push(' ');
                        sources.push(index);
                    } else {
                        for lower in glyph.ch.to_lowercase() {
                            chars.push(lower);
                            sources.push(index);
                        }
                    }
                }
            }
        }

        (chars, sources)
    }

    /// Non-overlapping occurrences of `needle`, each as highlight boxes, one per line fragment.
    pub fn find(&self, glyphs: &[Glyph], needle: &str) -> Vec<Vec<Rect>> {
        let needle = self.normalize(needle);
        if needle.is_empty() {
            return Vec::new();
        }

        let (haystack, sources) = self.normalize_glyphs(glyphs);
        let mut occurrences = Vec::new();
        let mut start = 0;

        while start + needle.len() <= haystack.len() {
            if haystack[start..start + needle.len()] == needle[..] {
                let first = sources[start];
                let last = sources[start + needle.len() - 1];
                let boxes = line_fragments(&glyphs[first..=last]);
                if !boxes.is_empty() {
                    occurrences.push(boxes);
                }
                start += needle.len();
            } else {
                start += 1;
            }
        }

        occurrences
    }
}

fn trim(mut chars: Vec<char>) -> Vec<char> {
    while chars.last().is_some_and(|c| c.is_whitespace()) {
        chars.pop();
    }
    let leading = chars.iter().take_while(|c| c.is_whitespace()).count();
    chars.drain(..leading);
    chars
}

/// Merge glyph boxes into one rectangle per baseline.
fn line_fragments(glyphs: &[Glyph]) -> Vec<Rect> {
    let mut fragments: Vec<Rect> = Vec::new();

    for bbox in glyphs.iter().filter_map(|g| g.bbox) {
        match fragments.last_mut() {
            Some(current) if same_line(current, &bbox) => *current = current.union(&bbox),
            _ => fragments.push(bbox),
        }
    }

    fragments
}

fn same_line(a: &Rect, b: &Rect) -> bool {
    let tolerance = a.height().min(b.height()) * 0.5;
    (a.y0 - b.y0).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(text: &str, y: f32) -> Vec<Glyph> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| Glyph {
                ch,
                bbox: Some(Rect {
                    x0: i as f32 * 5.0,
                    y0: y,
                    x1: i as f32 * 5.0 + 5.0,
                    y1: y + 10.0,
                }),
            })
            .collect()
    }

    #[test]
    fn test_normalization_collapses_whitespace_and_case() {
        let searcher = TextSearcher::new(SearchMode::Normalized);
        let normalized: String = searcher.normalize("  Large \t  Datasets ").into_iter().collect();
        assert_eq!(normalized, "large datasets");
    }

    #[test]
    fn test_exact_mode_is_case_sensitive() {
        let glyphs = line("Large datasets", 100.0);
        assert!(TextSearcher::new(SearchMode::Exact).find(&glyphs, "large datasets").is_empty());
        assert_eq!(
            TextSearcher::new(SearchMode::Normalized)
                .find(&glyphs, "large datasets")
                .len(),
            1
        );
    }

    #[test]
    fn test_occurrence_box_covers_match_only() {
        let glyphs = line("need large datasets", 100.0);
        let found = TextSearcher::new(SearchMode::Normalized).find(&glyphs, "large");

        assert_eq!(
            found,
            vec![vec![Rect {
                x0: 25.0,
                y0: 100.0,
                x1: 50.0,
                y1: 110.0
            }]]
        );
    }

    #[test]
    fn test_occurrences_do_not_overlap() {
        let glyphs = line("aaaa", 0.0);
        assert_eq!(TextSearcher::new(SearchMode::Exact).find(&glyphs, "aa").len(), 2);
    }

    #[test]
    fn test_match_across_lines_splits_into_fragments() {
        let mut glyphs = line("large", 200.0);
        glyphs.push(Glyph { ch: ' ', bbox: None });
        glyphs.extend(line("datasets", 180.0));

        let found = TextSearcher::new(SearchMode::Normalized).find(&glyphs, "large datasets");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].len(), 2);
    }

    #[test]
    fn test_blank_needle_finds_nothing() {
        let glyphs = line("anything", 0.0);
        assert!(TextSearcher::new(SearchMode::Normalized).find(&glyphs, "   ").is_empty());
    }
}
