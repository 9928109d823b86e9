// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    config::Config,
    error::AppError,
    models::user::{AdminLoginRequest, AppUser, normalize},
    store::ScoreStore,
    utils::{hash::verify_password, jwt::sign_jwt},
};

/// Resolves an admin from email and password.
///
/// * 400 when either field is blank.
/// * 404 when no account has the email.
/// * 401 when the password does not verify against the stored hash.
/// * 403 when the account is not an admin.
pub async fn authenticate_admin(
    store: &dyn ScoreStore,
    req: &AdminLoginRequest,
) -> Result<AppUser, AppError> {
    let email = normalize(req.email.as_deref());
    let password = req.password.as_deref().unwrap_or_default().trim();

    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::NotFound("No account found for this email".to_string()))?;

    if !verify_password(password, user.password.as_deref()) {
        tracing::warn!("Rejected statistics login for {}", email);
        return Err(AppError::AuthError("Incorrect password".to_string()));
    }

    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(user)
}

/// Authenticates an admin and returns a JWT token.
pub async fn login(
    State(store): State<Arc<dyn ScoreStore>>,
    State(config): State<Config>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = authenticate_admin(store.as_ref(), &payload).await?;

    let token = sign_jwt(&user, &config.jwt_secret, config.jwt_expiration)?;

    tracing::info!("Admin {} logged in", user.email);

    Ok(Json(json!({
        "ok": true,
        "token": token,
        "type": "Bearer",
        "expires_in": config.jwt_expiration,
    })))
}
