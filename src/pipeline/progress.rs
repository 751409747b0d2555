// file: src/pipeline/progress.rs
// description: stage spinners and per session statistics for interactive use
// reference: uses indicatif for spinners and tracks search outcomes

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub uploads: usize,
    pub searches: usize,
    pub matches: usize,
    pub misses: usize,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_upload(&mut self) {
        self.uploads += 1;
    }

    pub fn record_search(&mut self, matched: bool) {
        self.searches += 1;
        if matched {
            self.matches += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn match_rate(&self) -> f64 {
        if self.searches == 0 {
            return 0.0;
        }
        (self.matches as f64 / self.searches as f64) * 100.0
    }

    pub fn format(&self) -> String {
        format!(
            "Uploads: {} | Searches: {} | Matches: {} | Misses: {} ({:.1}% matched)",
            self.uploads,
            self.searches,
            self.matches,
            self.misses,
            self.match_rate()
        )
    }
}

/// Spinner shown while a long stage runs; hidden when progress output is off.
pub struct StageSpinner {
    bar: ProgressBar,
}

impl StageSpinner {
    pub fn new(message: &str, visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new_spinner();
            bar.set_style(create_spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(message.to_string());

        Self { bar }
    }

    pub fn hidden() -> Self {
        Self::new("", false)
    }

    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    pub fn message(&self) -> String {
        self.bar.message()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for StageSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_stats_calculations() {
        let mut stats = SessionStats::new();
        stats.record_upload();
        stats.record_search(true);
        stats.record_search(true);
        stats.record_search(false);
        stats.record_search(true);

        assert_eq!(stats.uploads, 1);
        assert_eq!(stats.matches, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.match_rate(), 75.0);
    }

    #[test]
    fn test_session_stats_no_searches() {
        let stats = SessionStats::new();
        assert_eq!(stats.match_rate(), 0.0);
        assert!(stats.format().contains("Searches: 0"));
    }

    #[test]
    fn test_hidden_spinner_tracks_message() {
        let spinner = StageSpinner::new("Preprocessing document", false);
        assert_eq!(spinner.message(), "Preprocessing document");

        spinner.set_message("Extracting text");
        assert_eq!(spinner.message(), "Extracting text");
        spinner.finish();
    }
}
