//! Store error types

use nudgewealth_types::NudgeError;
use thiserror::Error;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record in '{collection}' is not a JSON object")]
    NotAnObject { collection: String },
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for NudgeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Serialization(e) => NudgeError::Serialization {
                message: e.to_string(),
            },
            other => NudgeError::Store {
                message: other.to_string(),
            },
        }
    }
}
