// src/handlers/stats.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError,
    handlers::auth::authenticate_admin,
    models::{
        report::{Report, StatsResponse},
        user::{AdminLoginRequest, UserIdentity},
    },
    stats::{Lookups, aggregate},
    store::ScoreStore,
    utils::jwt::Claims,
};

/// Fetches a fresh snapshot and aggregates it for `admin`.
///
/// The result rows and the three lookup tables are read concurrently.
pub async fn build_report(store: &dyn ScoreStore, admin: UserIdentity) -> Result<Report, AppError> {
    let (rows, users, ranks, sections) = tokio::try_join!(
        store.list_results_newest_first(),
        store.list_users(),
        store.list_ranks(),
        store.list_sections(),
    )?;

    let lookups = Lookups::from_tables(&users, &ranks, &sections);
    Ok(aggregate(&rows, &lookups, admin))
}

/// Statistics for an admin identified by email and password in the body.
pub async fn get_stats(
    State(store): State<Arc<dyn ScoreStore>>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let admin = authenticate_admin(store.as_ref(), &payload).await?;
    let report = build_report(store.as_ref(), UserIdentity::from(&admin)).await?;

    Ok(Json(StatsResponse { ok: true, report }))
}

/// Statistics for the admin holding a valid bearer token.
pub async fn admin_stats(
    State(store): State<Arc<dyn ScoreStore>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let admin = store
        .find_user_by_id(claims.user_id()?)
        .await?
        .filter(|u| u.is_admin())
        .ok_or(AppError::AuthError("Admin account no longer exists".to_string()))?;

    let report = build_report(store.as_ref(), UserIdentity::from(&admin)).await?;

    Ok(Json(StatsResponse { ok: true, report }))
}
