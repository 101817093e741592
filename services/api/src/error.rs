//! Error types for the API service
//!
//! Application-level refusals (bad credentials, taken usernames, provider
//! failures) travel in response bodies with status 200. `ApiError` covers the
//! infrastructure failures that remain.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Internal server error
    #[error("Internal server error: {0:#}")]
    Internal(#[from] anyhow::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);

        let body = Json(json!({
            "error": "Internal server error",
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
