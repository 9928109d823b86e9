// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// Every body carries `"ok": false` and a human readable `"message"`.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 500, message names the failed lookup, detail carries the driver text
    Database { context: String, detail: String },

    // 400 Bad Request
    BadRequest(String),

    // 400 with itemised fields merged into the body (e.g. `missing_sections`)
    Rejected { message: String, details: Map<String, Value> },

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict, `status` distinguishes e.g. `username_mismatch` from `conflict`
    Conflict { status: &'static str, message: String },
}

impl AppError {
    /// Wraps a driver error with the name of the operation that failed.
    pub fn database(context: impl Into<String>, err: impl fmt::Display) -> Self {
        AppError::Database {
            context: context.into(),
            detail: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) | AppError::Database { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(_) | AppError::Rejected { .. } => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database { context, detail } => write!(f, "{}: {}", context, detail),
            other => write!(f, "{:?}", other),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = Map::new();
        body.insert("ok".to_string(), Value::Bool(false));

        match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                body.insert("message".to_string(), json!("Internal Server Error"));
            }
            AppError::Database { context, detail } => {
                tracing::error!("{}: {}", context, detail);
                body.insert("message".to_string(), json!(context));
                body.insert("detail".to_string(), json!(detail));
            }
            AppError::Rejected { message, details } => {
                body.insert("message".to_string(), json!(message));
                body.extend(details);
            }
            AppError::Conflict { status, message } => {
                body.insert("status".to_string(), json!(status));
                body.insert("message".to_string(), json!(message));
            }
            AppError::BadRequest(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => {
                body.insert("message".to_string(), json!(msg));
            }
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

/// Converts `sqlx::Error` into a generic database error.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::database("Database error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
