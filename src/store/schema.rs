use serde::{Deserialize, Serialize};

/// Key the progress snapshot lives under in the key-value store.
pub const PROGRESS_KEY: &str = "rockbusters-progress";

/// Persisted session progress. Field names follow the stored JSON blob.
/// Every field defaults, so partially written blobs still load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressSnapshot {
    pub current_position: usize,
    pub score: u32,
    pub answered_questions: Vec<usize>,
    pub skipped_questions: Vec<usize>,
    pub revealed_questions: Vec<usize>,
    pub question_order: Vec<usize>,
    pub total_attempts: u32,
}
