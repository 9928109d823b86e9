// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod stats;
pub mod store;
pub mod submission;
pub mod utils;

pub use routes::create_router;
pub use stats::{Lookups, aggregate};
