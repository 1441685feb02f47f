//! Application error types and result alias.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::{Envelope, ErrorBody};

/// Application result type alias
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed path/query parameter or request body
    #[error("{message}: {details}")]
    InvalidInput { message: String, details: String },

    /// Target row does not exist
    #[error("{message}: {details}")]
    NotFound { message: String, details: String },

    /// Attempt to mutate a protected default asset
    #[error("Unauthorized operation: {0}")]
    UnauthorizedOperation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Bounded operation exceeded its deadline
    #[error("Operation timed out")]
    Timeout,

    /// Object store unreachable or rejected the request
    #[error("Storage error: {0}")]
    Storage(String),

    /// Object key does not exist in the store
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Object exists but its body could not be read
    #[error("Read failure: {0}")]
    ReadFailure(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Address parse error
    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details: details.into(),
        }
    }

    pub fn invalid_body(details: impl Into<String>) -> Self {
        Self::invalid("invalid request body", details)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            details: String::new(),
        }
    }

    /// Status code, stable client-facing message and lower-level details.
    pub fn parts(&self) -> (StatusCode, String, String) {
        match self {
            AppError::InvalidInput { message, details } => {
                (StatusCode::BAD_REQUEST, message.clone(), details.clone())
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, message.clone(), details.clone())
            }
            AppError::UnauthorizedOperation(msg) => {
                (StatusCode::UNAUTHORIZED, msg.clone(), String::new())
            }
            AppError::Database(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database error".to_string(),
                e.to_string(),
            ),
            AppError::Migration(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database migration failed".to_string(),
                e.to_string(),
            ),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "database: operation timed out".to_string(),
                String::new(),
            ),
            AppError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage: storage connection error".to_string(),
                msg.clone(),
            ),
            AppError::ObjectNotFound(key) => (
                StatusCode::NOT_FOUND,
                "storage: object not found".to_string(),
                key.clone(),
            ),
            AppError::ReadFailure(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage: failed to read object".to_string(),
                msg.clone(),
            ),
            AppError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration error".to_string(),
                msg.clone(),
            ),
            AppError::Io(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io error".to_string(),
                e.to_string(),
            ),
            AppError::AddrParse(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid address".to_string(),
                e.to_string(),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
                msg.clone(),
            ),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_body(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = self.parts();
        let envelope = Envelope::new(ErrorBody {
            error: message,
            details,
        });

        tracing::error!(
            response_id = %envelope.id,
            status = status.as_u16(),
            error = %self,
            "Request failed"
        );

        (status, Json(envelope)).into_response()
    }
}
