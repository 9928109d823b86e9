// src/handlers/score.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        result::{AttemptResultRow, CreateScoreRequest, CreateScoreResponse},
        user::normalize,
    },
    store::ScoreStore,
    submission::{parse_sections, section_index},
};

/// Records one quiz attempt.
///
/// Every section in the payload becomes one result row; all rows share a
/// fresh attempt group id and the same timestamp.
pub async fn create_score(
    State(store): State<Arc<dyn ScoreStore>>,
    Json(payload): Json<CreateScoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize(payload.email.as_deref());
    let rank_name = payload.rank.as_deref().unwrap_or_default().trim();

    if email.is_empty() || rank_name.is_empty() {
        return Err(AppError::BadRequest(
            "email and rank are required".to_string(),
        ));
    }

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::NotFound("User not found for this email".to_string()))?;

    let rank = store
        .find_rank_by_name(rank_name)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Rank not found: {}", rank_name)))?;

    let sections = store.list_sections().await?;
    if sections.is_empty() {
        return Err(AppError::InternalServerError(
            "No sections configured in database".to_string(),
        ));
    }

    let results = parse_sections(&payload.sections, &section_index(&sections))?;

    let attempt_group_id = Uuid::new_v4();
    let attempted_at = Utc::now();

    let rows: Vec<AttemptResultRow> = results
        .into_iter()
        .map(|r| AttemptResultRow {
            attempt_group_id,
            user_id: user.id,
            rank_id: rank.id,
            section_id: r.section_id,
            total_questions: r.total_questions,
            correct_answers: r.correct_answers,
            attempted_at,
        })
        .collect();

    let rows_inserted = store.insert_results(&rows).await?;

    tracing::info!(
        %attempt_group_id,
        user_id = user.id,
        rank = %rank.name,
        rows_inserted,
        "Recorded attempt"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateScoreResponse {
            ok: true,
            status: "created".to_string(),
            attempt_group_id,
            user_id: user.id,
            rank_id: rank.id,
            rows_inserted,
        }),
    ))
}
