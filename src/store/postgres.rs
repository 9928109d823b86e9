// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::{
        result::{AttemptResultRow, Rank, Section},
        user::{AppUser, ROLE_ADMIN, ROLE_USER},
    },
    store::ScoreStore,
};

const USER_COLUMNS: &str = "id, username, email, password, role, created_at";

/// PostgreSQL backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_with_role(
        &self,
        email: &str,
        username: &str,
        password_hash: Option<&str>,
        role: &str,
    ) -> Result<AppUser, AppError> {
        let sql = format!(
            "INSERT INTO app_users (email, username, password, role) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, AppUser>(&sql)
            .bind(email)
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let unique = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if unique {
                    AppError::Conflict {
                        status: "conflict",
                        message: "Email already exists".to_string(),
                    }
                } else {
                    AppError::database("Database error (insert user)", e)
                }
            })
    }
}

#[async_trait]
impl ScoreStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AppUser>, AppError> {
        let sql = format!("SELECT {} FROM app_users WHERE email = $1 LIMIT 1", USER_COLUMNS);

        sqlx::query_as::<_, AppUser>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Database error (user lookup)", e))
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<AppUser>, AppError> {
        let sql = format!("SELECT {} FROM app_users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, AppUser>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Database error (user lookup)", e))
    }

    async fn insert_user(&self, email: &str, username: &str) -> Result<AppUser, AppError> {
        self.insert_with_role(email, username, None, ROLE_USER).await
    }

    async fn insert_admin(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<AppUser, AppError> {
        self.insert_with_role(email, username, Some(password_hash), ROLE_ADMIN)
            .await
    }

    async fn list_users(&self) -> Result<Vec<AppUser>, AppError> {
        let sql = format!("SELECT {} FROM app_users ORDER BY id", USER_COLUMNS);

        sqlx::query_as::<_, AppUser>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("Database error (lookups)", e))
    }

    async fn find_rank_by_name(&self, name: &str) -> Result<Option<Rank>, AppError> {
        sqlx::query_as::<_, Rank>(
            "SELECT id, name FROM ranks WHERE LOWER(name) = LOWER($1) ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("Database error (rank lookup)", e))
    }

    async fn list_ranks(&self) -> Result<Vec<Rank>, AppError> {
        sqlx::query_as::<_, Rank>("SELECT id, name FROM ranks ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("Database error (lookups)", e))
    }

    async fn list_sections(&self) -> Result<Vec<Section>, AppError> {
        sqlx::query_as::<_, Section>("SELECT id, name, order_no FROM sections ORDER BY order_no, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("Database error (sections lookup)", e))
    }

    async fn insert_results(&self, rows: &[AttemptResultRow]) -> Result<u64, AppError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO results (attempt_group_id, user_id, rank_id, section_id, total_questions, correct_answers, attempted_at) ",
        );
        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.attempt_group_id)
                .push_bind(row.user_id)
                .push_bind(row.rank_id)
                .push_bind(row.section_id)
                .push_bind(row.total_questions)
                .push_bind(row.correct_answers)
                .push_bind(row.attempted_at);
        });

        // A single multi-row INSERT is atomic on its own.
        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Database error (insert results)", e))?;

        Ok(result.rows_affected())
    }

    async fn list_results_newest_first(&self) -> Result<Vec<AttemptResultRow>, AppError> {
        sqlx::query_as::<_, AttemptResultRow>(
            r#"
            SELECT
                attempt_group_id,
                user_id,
                rank_id,
                section_id,
                total_questions,
                correct_answers,
                attempted_at
            FROM results
            ORDER BY attempted_at DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("Database error (results)", e))
    }
}
