// src/models/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Represents the 'results' table: one row per section per attempt.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct AttemptResultRow {
    pub attempt_group_id: Uuid,
    pub user_id: i64,
    pub rank_id: i64,
    pub section_id: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub attempted_at: DateTime<Utc>,
}

/// Represents the 'ranks' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Rank {
    pub id: i64,
    pub name: String,
}

/// Represents the 'sections' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub order_no: i32,
}

/// DTO for submitting a new attempt.
///
/// Every key other than `email` and `rank` names a section, e.g.
/// `{"email": "a@b.c", "rank": "Gold", "Algebra": {"total_questions": 10, "correct_answers": 7}}`.
#[derive(Debug, Deserialize)]
pub struct CreateScoreRequest {
    pub email: Option<String>,
    pub rank: Option<String>,
    #[serde(flatten)]
    pub sections: serde_json::Map<String, serde_json::Value>,
}

/// Response body for a stored attempt.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateScoreResponse {
    pub ok: bool,
    pub status: String,
    pub attempt_group_id: Uuid,
    pub user_id: i64,
    pub rank_id: i64,
    pub rows_inserted: u64,
}
