//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto HTTP responses.

use crate::config::ConfigError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futureme_core::{ServiceError, StoreError};
use serde_json::json;
use tracing::{error, warn};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the domain operations.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request body was not the JSON the endpoint expects.
    #[error("{}", .0.body_text())]
    JsonBody(#[from] JsonRejection),

    /// The query string did not carry the parameters the endpoint expects.
    #[error("{}", .0.body_text())]
    QueryString(#[from] QueryRejection),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying the embedded migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(e) => match e {
                ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
                ServiceError::Auth => StatusCode::UNAUTHORIZED,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Storage(StoreError::MalformedId(_)) => StatusCode::BAD_REQUEST,
                ServiceError::Storage(_) | ServiceError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::JsonBody(rejection) => rejection.status(),
            ApiError::QueryString(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The field a deserialization message blames, when it names one.
fn rejected_field(message: &str) -> Option<String> {
    if let Some((_, rest)) = message.split_once("missing field `") {
        return rest.split('`').next().map(str::to_string);
    }
    // Type errors are prefixed with the path of the offending value.
    let (_, detail) = message.split_once("target type: ")?;
    let (path, _) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    is_path.then(|| path.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Service(ServiceError::Validation(e)) => {
                json!({ "detail": e.to_string(), "field": e.field() })
            }
            ApiError::JsonBody(_) | ApiError::QueryString(_) => {
                let detail = self.to_string();
                match rejected_field(&detail) {
                    Some(field) => json!({ "detail": detail, "field": field }),
                    None => json!({ "detail": detail }),
                }
            }
            _ if status.is_server_error() => {
                error!("Request failed: {}", self);
                json!({ "detail": "Internal server error" })
            }
            _ => json!({ "detail": self.to_string() }),
        };
        if status.is_client_error() {
            warn!("Request rejected ({}): {}", status, self);
        }
        (status, Json(body)).into_response()
    }
}
