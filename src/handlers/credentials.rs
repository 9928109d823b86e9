// src/handlers/credentials.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{CheckCredentialsRequest, Credentials},
    store::ScoreStore,
};

/// Matches an existing user by email or registers a new one.
///
/// * 200 `existing_user` when email and username both match.
/// * 409 `username_mismatch` when the email belongs to another username.
/// * 201 `created` when the email was unknown.
/// * 409 `conflict` when a concurrent registration claimed the email first.
pub async fn check_credentials(
    State(store): State<Arc<dyn ScoreStore>>,
    Json(payload): Json<CheckCredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let creds = Credentials::from(payload);

    if creds.username.is_empty() || creds.email.is_empty() {
        return Err(AppError::BadRequest(
            "username and email are required".to_string(),
        ));
    }
    creds.validate()?;

    if let Some(existing) = store.find_user_by_email(&creds.email).await? {
        if existing.username.trim().to_lowercase() != creds.username {
            return Err(AppError::Conflict {
                status: "username_mismatch",
                message: "A different username is already registered with this email".to_string(),
            });
        }

        return Ok((
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "status": "existing_user",
                "user_id": existing.id,
                "message": "Email and username match"
            })),
        ));
    }

    let user = store.insert_user(&creds.email, &creds.username).await?;
    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "ok": true,
            "status": "created",
            "user_id": user.id,
            "message": "New user created"
        })),
    ))
}
