// src/models/mod.rs

pub mod report;
pub mod result;
pub mod user;
