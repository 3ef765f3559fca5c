use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{debug, error};

use crate::views;

/// Application-level error taxonomy.
///
/// Handlers that render forms intercept `DuplicateKey` and validation
/// failures themselves to re-render the submitting form with messages;
/// anything that reaches the response mapping below is terminal for the
/// request. Anonymous callers never surface here either: the HTML handlers
/// redirect to the login page and the likes API answers a soft JSON payload.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("not authorized")]
    Unauthorized,
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// True when the database rejected a write because of a unique constraint,
/// which is how username/email collisions surface from the storage layer.
pub fn is_unique_violation(err: &DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("unique") || message.contains("constraint")
}

/// Flatten `validator` errors into one message per failed field check.
pub fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => {
                debug!("{what} not found");
                (StatusCode::NOT_FOUND, views::not_found_page()).into_response()
            }
            AppError::DuplicateKey(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "not authorized").into_response(),
            AppError::Internal(message) => {
                error!("internal error: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            AppError::Database(db_error) => {
                error!("database error: {db_error}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
