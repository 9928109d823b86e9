// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use scoreboard::{
    config::Config,
    error::AppError,
    models::{
        result::{AttemptResultRow, Rank, Section},
        user::{AppUser, ROLE_ADMIN, ROLE_USER},
    },
    routes,
    state::AppState,
    store::ScoreStore,
    utils::hash::hash_password,
};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "s3cret-admin";

#[derive(Default)]
struct Tables {
    users: Vec<AppUser>,
    ranks: Vec<Rank>,
    sections: Vec<Section>,
    results: Vec<AttemptResultRow>,
}

/// In-memory `ScoreStore` used to drive the HTTP layer without PostgreSQL.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn add_rank(&self, name: &str) -> i64 {
        let mut t = self.tables.lock().unwrap();
        let id = t.ranks.len() as i64 + 1;
        t.ranks.push(Rank { id, name: name.to_string() });
        id
    }

    pub fn add_section(&self, name: &str) -> i64 {
        let mut t = self.tables.lock().unwrap();
        let id = t.sections.len() as i64 + 1;
        t.sections.push(Section { id, name: name.to_string(), order_no: id as i32 });
        id
    }

    /// Registers a regular user that nevertheless carries a password hash.
    pub fn add_user_with_password(&self, email: &str, username: &str, password: &str) -> AppUser {
        let hash = hash_password(password).unwrap();
        self.insert(email, username, Some(hash), ROLE_USER).unwrap()
    }

    pub fn results(&self) -> Vec<AttemptResultRow> {
        self.tables.lock().unwrap().results.clone()
    }

    pub fn push_result(&self, row: AttemptResultRow) {
        self.tables.lock().unwrap().results.push(row);
    }

    fn insert(&self, email: &str, username: &str, password: Option<String>, role: &str) -> Result<AppUser, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict {
                status: "conflict",
                message: "Email already exists".to_string(),
            });
        }
        let user = AppUser {
            id: t.users.len() as i64 + 1,
            username: username.to_string(),
            email: email.to_string(),
            password,
            role: role.to_string(),
            created_at: Some(Utc::now()),
        };
        t.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AppUser>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<AppUser>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, email: &str, username: &str) -> Result<AppUser, AppError> {
        self.insert(email, username, None, ROLE_USER)
    }

    async fn insert_admin(&self, email: &str, username: &str, password_hash: &str) -> Result<AppUser, AppError> {
        self.insert(email, username, Some(password_hash.to_string()), ROLE_ADMIN)
    }

    async fn list_users(&self) -> Result<Vec<AppUser>, AppError> {
        Ok(self.tables.lock().unwrap().users.clone())
    }

    async fn find_rank_by_name(&self, name: &str) -> Result<Option<Rank>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.ranks.iter().find(|r| r.name.eq_ignore_ascii_case(name)).cloned())
    }

    async fn list_ranks(&self) -> Result<Vec<Rank>, AppError> {
        Ok(self.tables.lock().unwrap().ranks.clone())
    }

    async fn list_sections(&self) -> Result<Vec<Section>, AppError> {
        Ok(self.tables.lock().unwrap().sections.clone())
    }

    async fn insert_results(&self, rows: &[AttemptResultRow]) -> Result<u64, AppError> {
        let mut t = self.tables.lock().unwrap();
        t.results.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn list_results_newest_first(&self) -> Result<Vec<AttemptResultRow>, AppError> {
        let mut rows = self.tables.lock().unwrap().results.clone();
        rows.sort_by(|a, b| b.attempted_at.cmp(&a.attempted_at));
        Ok(rows)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        cors_origins: Vec::new(),
        admin_email: None,
        admin_username: None,
        admin_password: None,
    }
}

/// A store with one admin, two ranks and three sections.
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::default();
    let hash = hash_password(ADMIN_PASSWORD).unwrap();
    store.insert_admin(ADMIN_EMAIL, "admin", &hash).await.unwrap();
    store.add_rank("Bronze");
    store.add_rank("Gold");
    store.add_section("Geometry");
    store.add_section("Algebra");
    store.add_section("Logic");
    store
}

/// Spawns the app on a random port and returns its base URL.
pub async fn spawn_app(store: MemoryStore) -> String {
    let app = routes::create_router(AppState::new(store, test_config()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn row(user_id: i64, group: Uuid, section_id: i64, correct: i32, total: i32, minutes: i64) -> AttemptResultRow {
    AttemptResultRow {
        attempt_group_id: group,
        user_id,
        rank_id: 1,
        section_id,
        total_questions: total,
        correct_answers: correct,
        attempted_at: at(minutes),
    }
}
