// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod finder;
mod progress;

pub use finder::{Finder, UploadSummary};
pub use progress::{SessionStats, StageSpinner};
