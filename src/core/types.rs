// src/core/types.rs - Conversation data types

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Capitalized form used in history listings.
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn in the conversation. Stored messages are never edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(rename = "timestamp", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Local>,
}

/// Accepts RFC 3339, plus offset-less ISO 8601 timestamps read as local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| {
            serde::de::Error::custom(format!("timestamp {raw:?} does not exist in local time"))
        })
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Local::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A display row produced by `Session::summarize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    /// 1-based position in the history.
    pub index: usize,
    pub role: Role,
    pub content: String,
}

impl std::fmt::Display for HistoryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}: {}", self.index, self.role.label(), self.content)
    }
}

/// Session-wide request parameters. Fixed for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub context_window: usize,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            context_window: 10,
            max_output_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl From<&crate::infra::config::SessionConfig> for SessionSettings {
    fn from(c: &crate::infra::config::SessionConfig) -> Self {
        Self {
            context_window: c.context_window,
            max_output_tokens: c.max_output_tokens,
            temperature: c.temperature,
        }
    }
}
