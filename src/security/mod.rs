// src/security/mod.rs

pub mod credentials;
pub mod permissions;
