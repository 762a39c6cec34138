// src/core/session.rs - Conversation state and turn submission

use std::sync::Arc;

use crate::core::types::{HistoryLine, Message, SessionSettings};
use crate::infra::errors::ChatError;
use crate::provider::{ChatRequest, CompletionProvider, WireMessage};
use crate::security::credentials::{Credential, CredentialResolver};
use crate::util::truncate_with_ellipsis;

/// Everything needed to start a session except the credential.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub model_id: String,
    pub system_prompt: String,
    pub settings: SessionSettings,
}

impl SessionOptions {
    pub fn new(model_id: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            system_prompt: system_prompt.into(),
            settings: SessionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// A single conversation. Turns take `&mut self`, so one session serves
/// one caller at a time.
pub struct Session {
    model_id: String,
    system_prompt: Message,
    history: Vec<Message>,
    settings: SessionSettings,
    credential: Credential,
    provider: Arc<dyn CompletionProvider>,
}

impl Session {
    /// Resolve the credential, then build the provider from it via `connect`.
    pub fn create<F>(
        options: SessionOptions,
        resolver: &CredentialResolver,
        connect: F,
    ) -> Result<Self, ChatError>
    where
        F: FnOnce(&Credential) -> Arc<dyn CompletionProvider>,
    {
        let credential = resolver.resolve()?;
        let provider = connect(&credential);
        tracing::info!(
            model = %options.model_id,
            provider = provider.id(),
            credential = %credential.source(),
            "Session created"
        );
        Ok(Self {
            model_id: options.model_id,
            system_prompt: Message::system(options.system_prompt),
            history: Vec::new(),
            settings: options.settings,
            credential,
            provider,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn system_prompt(&self) -> &Message {
        &self.system_prompt
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// The request the next call would send: the system prompt followed by
    /// the last `context_window` history messages.
    pub fn build_request(&self) -> ChatRequest {
        let start = self
            .history
            .len()
            .saturating_sub(self.settings.context_window);
        let messages = std::iter::once(&self.system_prompt)
            .chain(&self.history[start..])
            .map(WireMessage::from)
            .collect();

        ChatRequest {
            model: self.model_id.clone(),
            messages,
            max_tokens: self.settings.max_output_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Record `text` as a user turn, ask the provider for a reply and record
    /// it. On a provider failure the user message stays and no reply is
    /// recorded.
    pub async fn submit_user_turn(&mut self, text: &str) -> Result<String, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::InvalidInput);
        }

        self.history.push(Message::user(text));
        let request = self.build_request();

        let response = match self.provider.complete(request).await {
            Ok(r) if r.content.trim().is_empty() => {
                Err(ChatError::other("the model returned an empty reply"))
            }
            other => other,
        };

        match response {
            Ok(response) => {
                tracing::debug!(model = %response.model, "Reply received");
                self.history.push(Message::assistant(response.content.clone()));
                Ok(response.content)
            }
            Err(e) => {
                tracing::warn!(history = self.history.len(), "Turn failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Snapshot of the history for saving.
    pub fn export(&self) -> Vec<Message> {
        self.history.clone()
    }

    /// Display rows with content cut to `max_chars_per_message` characters.
    pub fn summarize(&self, max_chars_per_message: usize) -> Vec<HistoryLine> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, m)| HistoryLine {
                index: i + 1,
                role: m.role,
                content: truncate_with_ellipsis(&m.content, max_chars_per_message),
            })
            .collect()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("model_id", &self.model_id)
            .field("history", &self.history.len())
            .field("settings", &self.settings)
            .field("credential", &self.credential)
            .field("provider", &self.provider.id())
            .finish()
    }
}
