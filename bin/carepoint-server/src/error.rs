//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! Database and internal errors are logged with full detail but only a
//! generic message is returned to the caller. Upstream API failures carry the
//! upstream's own error body in `details`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::upstream::UpstreamError;

/// All errors that can occur in the carepoint-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the SQLite store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A model, maps or drug-label call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Credentials or bearer token rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
            ServerError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, json!({ "error": m })),

            ServerError::Upstream(e) => {
                error!(error = %e, service = e.service(), "upstream call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, upstream_body(e))
            }
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

fn upstream_body(e: &UpstreamError) -> Value {
    match e {
        UpstreamError::MissingKey { service } => json!({ "error": format!("{service} API key missing") }),
        UpstreamError::Transport { service, .. } => {
            json!({ "error": format!("{service} request failed") })
        }
        UpstreamError::Status { service, body, .. } => {
            json!({ "error": format!("{service} API error"), "details": body })
        }
        UpstreamError::Decode { service, .. } => {
            json!({ "error": format!("{service} returned an unreadable response") })
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingSecret => ServerError::Internal("JWT_SECRET is not configured".into()),
            AuthError::Hash(e) => ServerError::Internal(format!("password hashing failed: {e}")),
            AuthError::Join(e) => ServerError::Internal(format!("hashing task failed: {e}")),
            AuthError::Token(e) => ServerError::Unauthorized(format!("invalid token: {e}")),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = ?e, "converting anyhow error to ServerError::Internal");
        ServerError::Internal(e.to_string())
    }
}

impl From<validator::ValidationErrors> for ServerError {
    fn from(e: validator::ValidationErrors) -> Self {
        ServerError::BadRequest(e.to_string())
    }
}
