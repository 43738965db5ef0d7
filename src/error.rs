//! Error types for pr-attention
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in pr-attention
#[derive(Debug, Error)]
pub enum PrAttentionError {
    /// PR not present in the state store
    #[error("PR not found: {0}")]
    NotFound(String),

    /// PR exists but is no longer in the attention queue
    #[error("PR is not in attention queue: {0}")]
    NotActive(String),

    /// PR reference could not be parsed
    #[error("Invalid PR reference: {0}")]
    InvalidReference(String),

    /// Host search failed (process, exit status, or output)
    #[error("Search error: {0}")]
    Search(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for PrAttentionError {
    fn from(err: rusqlite::Error) -> Self {
        PrAttentionError::Storage(err.to_string())
    }
}

/// Result type alias for pr-attention operations
pub type Result<T> = std::result::Result<T, PrAttentionError>;
