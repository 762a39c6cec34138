// src/infra/config.rs - Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::paths;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Be friendly, informative, and concise in your responses.";
pub const DEFAULT_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub model: String,
    pub system_prompt: String,
    /// Trailing history messages sent with each request.
    pub context_window: usize,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            context_window: 10,
            max_output_tokens: 500,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub env_var: String,
    pub env_file: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_API_KEY_VAR.into(),
            env_file: paths::default_env_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_seconds: 60,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.session.model.trim().is_empty() {
            anyhow::bail!("session.model must not be empty");
        }
        if self.session.context_window == 0 {
            anyhow::bail!("session.context_window must be at least 1");
        }
        if !(0.0..=2.0).contains(&self.session.temperature) {
            anyhow::bail!(
                "session.temperature must be 0.0-2.0, got {}",
                self.session.temperature
            );
        }
        Ok(())
    }
}
