// src/models/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserIdentity;

/// Score of one section within an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScore {
    pub name: String,
    pub correct: i64,
    pub total: i64,
    pub pct: i64,
}

/// One sitting of the quiz, spanning several sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub attempt_group_id: Uuid,
    pub rank: String,
    pub attempted_at: DateTime<Utc>,
    /// Sorted by name ascending.
    pub sections: Vec<SectionScore>,
    pub total_correct: i64,
    pub total_questions: i64,
    pub pct: i64,
    pub pass: bool,
}

/// All attempts of one user, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReport {
    pub username: String,
    pub email: String,
    pub attempts: Vec<Attempt>,
}

/// Aggregated statistics delivered to the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub admin: UserIdentity,
    pub total_users: usize,
    pub total_attempts: usize,
    pub total_passes: usize,
    /// Ordered by each user's most recent attempt.
    pub users: Vec<UserReport>,
}

/// Wire form of a successful statistics response.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub report: Report,
}
