// src/provider/mod.rs - Completion provider layer

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::types::{Message, Role};
use crate::infra::errors::ChatError;

/// The external service that turns a message list into a reply.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ChatError>;
}

/// A message as sent over the wire: role and content only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(m: &Message) -> Self {
        Self {
            role: m.role,
            content: m.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub content: String,
    /// Model name reported back by the service.
    pub model: String,
}
