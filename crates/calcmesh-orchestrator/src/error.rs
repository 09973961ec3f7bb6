//! Orchestrator-wide error type. Every handler-reachable failure funnels
//! through here so the HTTP layer has exactly one place that decides
//! status codes (spec §6/§7).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("malformed request body")]
    BadRequest,

    #[error("expression is invalid: {0}")]
    InvalidExpression(String),

    #[error("login already exists")]
    UserExists,

    #[error("no such login")]
    WrongLogin,

    #[error("wrong password")]
    WrongPassword,

    #[error("missing or invalid bearer token")]
    Unauthorized,

    #[error("expression not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for OrchestratorError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            OrchestratorError::BadRequest => (StatusCode::BAD_REQUEST, self.to_string()),
            OrchestratorError::InvalidExpression(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            OrchestratorError::UserExists => (StatusCode::CONFLICT, self.to_string()),
            OrchestratorError::WrongLogin => (StatusCode::NOT_FOUND, self.to_string()),
            OrchestratorError::WrongPassword => (StatusCode::UNAUTHORIZED, self.to_string()),
            OrchestratorError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            OrchestratorError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            OrchestratorError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
            OrchestratorError::Hash(e) => {
                tracing::error!(error = %e, "password hashing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
            OrchestratorError::Token(e) => {
                tracing::error!(error = %e, "token error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
            OrchestratorError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
