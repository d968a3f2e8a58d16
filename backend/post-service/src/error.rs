/// Error types for Post Service
///
/// Expected failures (validation, rate limiting, missing caller identity) carry
/// an actionable message back to the client. Internal failures (integrity
/// violations, unavailable collaborators) are logged where they happen and
/// reach the client only as a generic server error.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::identity::IdentityError;
use crate::store::StoreError;

/// Result type for post-service operations
pub type Result<T> = std::result::Result<T, AppError>;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Client input failed validation for a specific field
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// Caller exceeded its write quota
    #[error("Too many requests")]
    RateLimited,

    /// A stored post references an author the identity provider cannot resolve
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Post storage failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Identity provider failed
    #[error("Identity provider unavailable: {0}")]
    IdentityUnavailable(String),

    /// No caller identity on a request that needs one
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// Field the error is scoped to, for client-side rendering.
    pub fn field(&self) -> Option<&str> {
        match self {
            AppError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation { message, .. } => message.clone(),
            AppError::RateLimited => self.to_string(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::DataIntegrity(_)
            | AppError::StorageUnavailable(_)
            | AppError::IdentityUnavailable(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::DataIntegrity(_)
            | AppError::StorageUnavailable(_)
            | AppError::IdentityUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut body = serde_json::json!({
            "error": self.public_message(),
            "status": status.as_u16(),
        });
        if let Some(field) = self.field() {
            body["field"] = serde_json::Value::String(field.to_string());
        }

        HttpResponse::build(status).json(body)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StorageUnavailable(err.to_string())
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        AppError::IdentityUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::DataIntegrity("post 42 has unresolved author user_9".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);

        let err = AppError::from(StoreError::Unavailable("connection refused".to_string()));
        assert!(matches!(err, AppError::StorageUnavailable(_)));
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn validation_error_is_field_scoped() {
        let err = AppError::Validation {
            field: "content".to_string(),
            message: "Only emojis are allowed".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.field(), Some("content"));
        assert_eq!(err.public_message(), "Only emojis are allowed");
    }

    #[test]
    fn rate_limited_maps_to_429() {
        assert_eq!(
            AppError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
