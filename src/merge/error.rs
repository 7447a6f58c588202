//! Error types for merge planning.

use std::path::PathBuf;

/// Error type for merge planning.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Interactive conflict mode configured without a prompt callback.
    #[error("interactive conflict resolution requires a prompt callback")]
    PromptRequired,

    /// Metadata read failed for a path involved in a conflict.
    #[error("failed to read metadata for {path}: {source}")]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for merge planning.
pub type Result<T> = std::result::Result<T, MergeError>;
