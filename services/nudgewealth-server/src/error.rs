//! API error handling
//!
//! Domain errors map onto HTTP status codes; the body is always
//! `{"error": <code>, "message": <text>}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nudgewealth_types::NudgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] NudgeError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => match e {
                NudgeError::RuleNotFound { .. } => "rule_not_found",
                NudgeError::DuplicateRule { .. } => "duplicate_rule",
                NudgeError::InvalidRule { .. } => "invalid_rule",
                NudgeError::TransactionNotFound { .. } => "transaction_not_found",
                NudgeError::InvalidTransaction { .. } => "invalid_transaction",
                NudgeError::Store { .. } => "store_error",
                NudgeError::Serialization { .. } => "serialization_error",
            },
            Self::BadRequest(_) => "bad_request",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Domain(e) => match e {
                NudgeError::RuleNotFound { .. } | NudgeError::TransactionNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                NudgeError::DuplicateRule { .. } => StatusCode::CONFLICT,
                NudgeError::InvalidRule { .. } | NudgeError::InvalidTransaction { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                NudgeError::Store { .. } | NudgeError::Serialization { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                NudgeError::RuleNotFound {
                    rule_id: "rule-9".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                NudgeError::DuplicateRule {
                    category: "Shopping".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                NudgeError::InvalidTransaction {
                    reason: "negative".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                NudgeError::Store {
                    message: "disk full".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }
}
