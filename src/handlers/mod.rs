// src/handlers/mod.rs

pub mod auth;
pub mod credentials;
pub mod health;
pub mod score;
pub mod stats;
