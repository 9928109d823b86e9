// src/stats.rs

//! Statistics aggregation.
//!
//! Turns the flat, newest-first stream of per-section result rows into the
//! nested `Report`: users, then their attempts, then the sections of each
//! attempt. Pure and synchronous; every call builds its own grouping state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    config::{PASS_THRESHOLD_PCT, UNKNOWN_LABEL},
    models::{
        report::{Attempt, Report, SectionScore, UserReport},
        result::{AttemptResultRow, Rank, Section},
        user::{AppUser, UserIdentity},
    },
};

/// Name tables used to label ids in the report.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub users: HashMap<i64, UserIdentity>,
    pub ranks: HashMap<i64, String>,
    pub sections: HashMap<i64, String>,
}

impl Lookups {
    pub fn from_tables(users: &[AppUser], ranks: &[Rank], sections: &[Section]) -> Self {
        Self {
            users: users.iter().map(|u| (u.id, UserIdentity::from(u))).collect(),
            ranks: ranks.iter().map(|r| (r.id, r.name.clone())).collect(),
            sections: sections.iter().map(|s| (s.id, s.name.clone())).collect(),
        }
    }

    fn user(&self, id: i64) -> UserIdentity {
        self.users.get(&id).cloned().unwrap_or_else(|| UserIdentity {
            username: UNKNOWN_LABEL.to_string(),
            email: UNKNOWN_LABEL.to_string(),
        })
    }

    fn rank(&self, id: i64) -> String {
        label(self.ranks.get(&id))
    }

    fn section(&self, id: i64) -> String {
        label(self.sections.get(&id))
    }
}

fn label(name: Option<&String>) -> String {
    name.cloned().unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

/// `round(correct / total * 100)` with ties going to the even neighbour,
/// computed exactly in integers. A zero (or negative) total gives 0.
pub fn percent(correct: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    let scaled = correct.clamp(0, total) * 100;
    let quotient = scaled / total;
    let twice_remainder = (scaled % total) * 2;

    if twice_remainder > total || (twice_remainder == total && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Attempt under construction. Carries running totals only; the attempt
/// percentage does not exist until `finish`.
struct AttemptBuilder {
    attempt_group_id: Uuid,
    rank: String,
    attempted_at: DateTime<Utc>,
    sections: Vec<SectionScore>,
    total_correct: i64,
    total_questions: i64,
}

impl AttemptBuilder {
    fn push(&mut self, name: String, correct: i64, total: i64) {
        self.total_correct += correct;
        self.total_questions += total;
        self.sections.push(SectionScore {
            name,
            correct,
            total,
            pct: percent(correct, total),
        });
    }

    fn finish(mut self) -> Attempt {
        self.sections.sort_by(|a, b| a.name.cmp(&b.name));
        let pct = percent(self.total_correct, self.total_questions);

        Attempt {
            attempt_group_id: self.attempt_group_id,
            rank: self.rank,
            attempted_at: self.attempted_at,
            sections: self.sections,
            total_correct: self.total_correct,
            total_questions: self.total_questions,
            pct,
            pass: pct >= PASS_THRESHOLD_PCT,
        }
    }
}

struct UserBuilder {
    identity: UserIdentity,
    attempts: Vec<AttemptBuilder>,
    attempt_index: HashMap<Uuid, usize>,
}

/// Brings a row's counts into `0 <= correct <= total`.
fn sanitize_counts(row: &AttemptResultRow) -> (i64, i64) {
    let total = i64::from(row.total_questions);
    let correct = i64::from(row.correct_answers);

    if total < 0 || correct < 0 || correct > total {
        tracing::warn!(
            attempt_group_id = %row.attempt_group_id,
            section_id = row.section_id,
            correct,
            total,
            "Clamping malformed result row"
        );
    }

    let total = total.max(0);
    (correct.clamp(0, total), total)
}

/// Aggregates result rows into a report.
///
/// `rows` must already be ordered by `attempted_at` descending. Users appear
/// in order of their first row, attempts within a user likewise, so both
/// end up newest first. Unknown ids are labelled `"Unknown"`.
pub fn aggregate(rows: &[AttemptResultRow], lookups: &Lookups, admin: UserIdentity) -> Report {
    let mut users: Vec<UserBuilder> = Vec::new();
    let mut user_index: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let user_pos = *user_index.entry(row.user_id).or_insert_with(|| {
            users.push(UserBuilder {
                identity: lookups.user(row.user_id),
                attempts: Vec::new(),
                attempt_index: HashMap::new(),
            });
            users.len() - 1
        });
        let user = &mut users[user_pos];

        let attempt_pos = *user
            .attempt_index
            .entry(row.attempt_group_id)
            .or_insert_with(|| {
                user.attempts.push(AttemptBuilder {
                    attempt_group_id: row.attempt_group_id,
                    rank: lookups.rank(row.rank_id),
                    attempted_at: row.attempted_at,
                    sections: Vec::new(),
                    total_correct: 0,
                    total_questions: 0,
                });
                user.attempts.len() - 1
            });

        let (correct, total) = sanitize_counts(row);
        user.attempts[attempt_pos].push(lookups.section(row.section_id), correct, total);
    }

    let users: Vec<UserReport> = users
        .into_iter()
        .map(|u| UserReport {
            username: u.identity.username,
            email: u.identity.email,
            attempts: u.attempts.into_iter().map(AttemptBuilder::finish).collect(),
        })
        .collect();

    let total_attempts: usize = users.iter().map(|u| u.attempts.len()).sum();
    let total_passes = users
        .iter()
        .flat_map(|u| &u.attempts)
        .filter(|a| a.pass)
        .count();

    tracing::debug!(
        rows = rows.len(),
        users = users.len(),
        total_attempts,
        total_passes,
        "Aggregated statistics"
    );

    Report {
        admin,
        total_users: users.len(),
        total_attempts,
        total_passes,
        users,
    }
}
