// src/core/mod.rs

pub mod session;
pub mod transcript;
pub mod types;
