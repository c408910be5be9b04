// src/error.rs

use thiserror::Error;

/// Failures raised while building a question.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid range: min {min} exceeds max {max}")]
    InvalidRange { min: u32, max: u32 },
    #[error("range bounds must be positive")]
    NonPositiveRange,
    #[error("option count must be at least 1")]
    EmptyOptionCount,
    #[error("table base must be positive")]
    ZeroTable,
    #[error("power base must be positive")]
    ZeroBase,
}

/// Failures at the persistence boundary. Gameplay never stops on these;
/// callers log and carry on with in-memory state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failures at the remote sync boundary. Local state stays authoritative.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
