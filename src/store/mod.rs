// src/store/mod.rs

//! Data access behind a trait so handlers never touch a global client.

pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        result::{AttemptResultRow, Rank, Section},
        user::AppUser,
    },
};

pub use postgres::PgStore;

/// Everything the HTTP layer needs from persistent storage.
///
/// Implementations report duplicate emails from `insert_user` as
/// `AppError::Conflict` and other failures as `AppError::Database`.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AppUser>, AppError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<AppUser>, AppError>;

    /// Registers a regular user.
    async fn insert_user(&self, email: &str, username: &str) -> Result<AppUser, AppError>;

    /// Registers an admin with an argon2 password hash.
    async fn insert_admin(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<AppUser, AppError>;

    async fn list_users(&self) -> Result<Vec<AppUser>, AppError>;

    /// Case-insensitive match on the rank name.
    async fn find_rank_by_name(&self, name: &str) -> Result<Option<Rank>, AppError>;

    async fn list_ranks(&self) -> Result<Vec<Rank>, AppError>;

    async fn list_sections(&self) -> Result<Vec<Section>, AppError>;

    /// Inserts all rows atomically and returns how many were written.
    async fn insert_results(&self, rows: &[AttemptResultRow]) -> Result<u64, AppError>;

    /// Every result row, ordered by `attempted_at` descending.
    async fn list_results_newest_first(&self) -> Result<Vec<AttemptResultRow>, AppError>;
}
