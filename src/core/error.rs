use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

/// PostgreSQL SQLSTATE for unique constraint violations
const PG_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for foreign key violations
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// True when the underlying database error is a unique constraint violation
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        Self::has_sqlstate(err, PG_UNIQUE_VIOLATION)
    }

    /// True when the underlying database error is a foreign key violation
    pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
        Self::has_sqlstate(err, PG_FOREIGN_KEY_VIOLATION)
    }

    fn has_sqlstate(err: &sqlx::Error, code: &str) -> bool {
        match err {
            sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
            _ => false,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "File storage is unavailable".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
