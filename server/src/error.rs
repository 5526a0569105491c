//! Error types for the HTTP layer and process startup.
//!
//! # Design
//! `ApiError` is what handlers return. Its `IntoResponse` impl is the single
//! place where failures become status codes, and the body is always the
//! plain-text `Display` of the underlying error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_core::ValidationError;

use crate::config::ConfigError;
use crate::store::StorageError;

/// Failures a request handler can report.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body, blank title, or non-numeric id. Maps to 400.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Only reported by the single-todo lookup. Maps to 404.
    #[error("todo not found")]
    NotFound,

    /// Anything raised by the persistence layer. Maps to 500.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Storage(e) => tracing::error!(error = %e, "storage failure"),
            other => tracing::debug!(error = %other, "rejected request"),
        }
        (status, self.to_string()).into_response()
    }
}

/// Fatal errors that stop the server before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("database: {0}")]
    Storage(#[from] StorageError),

    #[error("network: {0}")]
    Io(#[from] std::io::Error),
}
