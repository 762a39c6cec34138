// src/infra/errors.rs - Error types for chat-agent

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    // Startup errors (fatal)
    #[error("No API key found. Pass --api-key, set the environment variable, or add it to the .env file.")]
    CredentialMissing,

    // User errors
    #[error("Message is empty")]
    InvalidInput,

    // Provider errors (turn-level, the session keeps running)
    #[error("Authentication failed: {message}")]
    AuthenticationFailure { message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("API error: {message}")]
    TransientApi { message: String },

    #[error("{message}")]
    Other { message: String },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a failure, for callers that branch on kind
/// rather than matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Credential,
    Input,
    Authentication,
    RateLimit,
    Api,
    Other,
}

impl ChatError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::CredentialMissing => ErrorCategory::Credential,
            ChatError::InvalidInput => ErrorCategory::Input,
            ChatError::AuthenticationFailure { .. } => ErrorCategory::Authentication,
            ChatError::RateLimited { .. } => ErrorCategory::RateLimit,
            ChatError::TransientApi { .. } => ErrorCategory::Api,
            ChatError::Other { .. }
            | ChatError::Config(_)
            | ChatError::Io(_)
            | ChatError::Json(_) => ErrorCategory::Other,
        }
    }

    /// True for failures raised by the completion service. These end the
    /// current turn only.
    pub fn is_turn_failure(&self) -> bool {
        matches!(
            self,
            ChatError::AuthenticationFailure { .. }
                | ChatError::RateLimited { .. }
                | ChatError::TransientApi { .. }
                | ChatError::Other { .. }
        )
    }

    /// The line shown to the user in place of a reply.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::CredentialMissing => "Error: API key not found.".to_string(),
            ChatError::InvalidInput => "Error: Please enter a message.".to_string(),
            ChatError::AuthenticationFailure { .. } => {
                "Error: Invalid API key. Please check your OpenAI API key.".to_string()
            }
            ChatError::RateLimited { .. } => {
                "Error: Rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            ChatError::TransientApi { message } => format!("Error: OpenAI API error: {message}"),
            ChatError::Other { message } => format!("Error: Unexpected error: {message}"),
            other => format!("Error: {other}"),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        ChatError::Other {
            message: message.into(),
        }
    }
}
