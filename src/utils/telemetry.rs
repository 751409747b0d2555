// file: src/utils/telemetry.rs
// description: stage timing for upload and search operations

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// Logs the start and end of a named stage.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} in {:.2}s",
            self.operation,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn finish_with_count(self, count: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} - {} items in {:.2}s",
            self.operation,
            count,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn checkpoint(&self, message: &str) {
        info!(
            "Operation checkpoint [{}]: {} at {:.2}s",
            self.operation,
            message,
            self.elapsed().as_secs_f64()
        );
    }
}

/// Timing of one finished upload stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    pub stage: String,
    pub items: usize,
    pub duration_ms: u64,
}

impl StageMetrics {
    pub fn new(stage: &str, items: usize, duration: Duration) -> Self {
        Self {
            stage: stage.to_string(),
            items,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn format(&self) -> String {
        format!("{}: {} items in {}ms", self.stage, self.items, self.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("test");
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.finish();
        assert!(elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn test_stage_metrics_format() {
        let metrics = StageMetrics::new("keywords", 42, Duration::from_millis(1500));
        assert_eq!(metrics.duration_ms, 1500);
        assert_eq!(metrics.format(), "keywords: 42 items in 1500ms");
    }
}
