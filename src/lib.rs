// src/lib.rs - Library root for chat-agent

pub mod cli;
pub mod core;
pub mod infra;
pub mod provider;
pub mod security;
pub mod util;
