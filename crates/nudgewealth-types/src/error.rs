//! Error types for NudgeWealth
//!
//! Only user-facing mistakes and storage failures are errors. A missing rule
//! for a category is a "no restriction" policy, and advisory failures are
//! recovered inside the engine.

use thiserror::Error;

/// Result type for NudgeWealth operations
pub type Result<T> = std::result::Result<T, NudgeError>;

/// NudgeWealth error types
#[derive(Debug, Clone, Error)]
pub enum NudgeError {
    /// Rule not found
    #[error("Spending rule {rule_id} not found")]
    RuleNotFound { rule_id: String },

    /// A rule already exists for the category
    #[error("A spending rule for category '{category}' already exists")]
    DuplicateRule { category: String },

    /// Rule fields out of range
    #[error("Invalid spending rule: {reason}")]
    InvalidRule { reason: String },

    /// Transaction not found
    #[error("Transaction {transaction_id} not found")]
    TransactionNotFound { transaction_id: String },

    /// Submitted transaction is malformed
    #[error("Invalid transaction: {reason}")]
    InvalidTransaction { reason: String },

    /// Record store failure
    #[error("Store error: {message}")]
    Store { message: String },

    /// Record could not be (de)serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl NudgeError {
    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::RuleNotFound { .. }
                | Self::DuplicateRule { .. }
                | Self::InvalidRule { .. }
                | Self::TransactionNotFound { .. }
                | Self::InvalidTransaction { .. }
        )
    }
}

impl From<serde_json::Error> for NudgeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
