// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'app_users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AppUser {
    pub id: i64,

    pub username: String,

    /// Unique, stored lowercase.
    pub email: String,

    /// Argon2 password hash. Only admins have one.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: Option<String>,

    /// User role: 'user' or 'admin'.
    pub role: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AppUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Display identity used in reports: who a user is, without the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub username: String,
    pub email: String,
}

impl From<&AppUser> for UserIdentity {
    fn from(user: &AppUser) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Trims and lowercases a user supplied email or username.
pub fn normalize(raw: Option<&str>) -> String {
    raw.unwrap_or_default().trim().to_lowercase()
}

/// DTO for the credentials check (match existing user or register a new one).
#[derive(Debug, Deserialize)]
pub struct CheckCredentialsRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Normalised form of `CheckCredentialsRequest`, validated before any lookup.
#[derive(Debug, Validate)]
pub struct Credentials {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Username length must be between 1 and 50 characters."
    ))]
    pub username: String,
    #[validate(email(message = "Email must be a valid address."))]
    pub email: String,
}

impl From<CheckCredentialsRequest> for Credentials {
    fn from(req: CheckCredentialsRequest) -> Self {
        Self {
            username: normalize(req.username.as_deref()),
            email: normalize(req.email.as_deref()),
        }
    }
}

/// DTO for admin login and the statistics request.
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}
