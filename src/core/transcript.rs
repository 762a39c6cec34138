// src/core/transcript.rs - Saved conversation files (JSON)

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::core::types::Message;
use crate::infra::errors::ChatError;

/// `conversation_<YYYYMMDD_HHMMSS>.json`, local time.
pub fn default_filename() -> PathBuf {
    PathBuf::from(format!(
        "conversation_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Write `messages` as a JSON array, replacing any existing file.
/// Returns the path written.
pub fn save(messages: &[Message], path: Option<&Path>) -> Result<PathBuf, ChatError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_filename);
    let json = serde_json::to_string_pretty(messages)?;
    std::fs::write(&path, json)?;
    tracing::info!(messages = messages.len(), "Saved conversation to {}", path.display());
    Ok(path)
}

pub fn load(path: &Path) -> Result<Vec<Message>, ChatError> {
    let content = std::fs::read_to_string(path)?;
    let messages: Vec<Message> = serde_json::from_str(&content)?;
    Ok(messages)
}
