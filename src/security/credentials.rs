// src/security/credentials.rs - Layered API key resolution
//
// Sources are tried in a fixed order and the first non-empty value wins:
//   1. a value passed explicitly (CLI flag)
//   2. a named environment variable
//   3. a KEY=VALUE credential file (.env)

use std::path::{Path, PathBuf};

use crate::infra::config::{CredentialsConfig, DEFAULT_API_KEY_VAR};
use crate::infra::errors::ChatError;

/// Expected key prefix. Advisory only.
pub const KEY_PREFIX: &str = "sk-";
/// Shortest key length we consider plausible. Advisory only.
pub const MIN_KEY_LEN: usize = 20;
/// The value shipped in sample .env files.
pub const PLACEHOLDER_KEY: &str = "your-openai-api-key-here";

/// Where the credential was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit,
    EnvVar(String),
    EnvFile(PathBuf),
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "command-line"),
            Self::EnvVar(var) => write!(f, "env:{var}"),
            Self::EnvFile(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// A resolved secret. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    source: CredentialSource,
}

impl Credential {
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: value.into().trim().to_string(),
            source,
        }
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn masked(&self) -> String {
        mask_key(&self.value)
    }

    pub fn warnings(&self) -> Vec<String> {
        validate_key(&self.value)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("value", &self.masked())
            .field("source", &self.source)
            .finish()
    }
}

/// Ordered credential lookup.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    explicit: Option<String>,
    env_var: String,
    env_file: PathBuf,
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::from_config(&CredentialsConfig::default())
    }
}

impl CredentialResolver {
    pub fn new(env_var: impl Into<String>, env_file: impl Into<PathBuf>) -> Self {
        Self {
            explicit: None,
            env_var: env_var.into(),
            env_file: env_file.into(),
        }
    }

    pub fn from_config(config: &CredentialsConfig) -> Self {
        let env_var = if config.env_var.trim().is_empty() {
            DEFAULT_API_KEY_VAR.to_string()
        } else {
            config.env_var.clone()
        };
        Self::new(env_var, config.env_file.clone())
    }

    pub fn with_explicit(mut self, value: Option<String>) -> Self {
        self.explicit = value;
        self
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    pub fn env_file(&self) -> &Path {
        &self.env_file
    }

    /// Candidate sources in priority order.
    fn candidates(&self) -> [CredentialSource; 3] {
        [
            CredentialSource::Explicit,
            CredentialSource::EnvVar(self.env_var.clone()),
            CredentialSource::EnvFile(self.env_file.clone()),
        ]
    }

    fn lookup(&self, source: &CredentialSource) -> Option<String> {
        match source {
            CredentialSource::Explicit => self.explicit.clone(),
            CredentialSource::EnvVar(var) => std::env::var(var).ok(),
            CredentialSource::EnvFile(path) => read_env_file(path, &self.env_var),
        }
    }

    /// Try each source in order and stop at the first non-empty value.
    pub fn resolve(&self) -> Result<Credential, ChatError> {
        for source in self.candidates() {
            let Some(value) = self.lookup(&source) else {
                continue;
            };
            if value.trim().is_empty() {
                tracing::debug!("Credential source {} is empty, skipping", source);
                continue;
            }
            let credential = Credential::new(value, source);
            for warning in credential.warnings() {
                tracing::warn!(source = %credential.source(), "{}", warning);
            }
            tracing::debug!("Using API key from {}", credential.source());
            return Ok(credential);
        }
        Err(ChatError::CredentialMissing)
    }
}

/// Read `key` from a KEY=VALUE file. Blank lines and `#` comments are
/// skipped; the first line naming `key` decides. A missing or unreadable
/// file yields `None`.
pub fn read_env_file(path: &Path, key: &str) -> Option<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Could not read {}: {}", path.display(), e);
            }
            return None;
        }
    };
    parse_env_value(&content, key)
}

pub fn parse_env_value(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim().to_string())
}

/// Advisory findings about the shape of a key. Empty when it looks fine.
pub fn validate_key(key: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    if key == PLACEHOLDER_KEY {
        warnings.push("API key is still the placeholder value".to_string());
        return warnings;
    }
    if !key.starts_with(KEY_PREFIX) {
        warnings.push(format!("API key does not start with '{KEY_PREFIX}'"));
    }
    if key.chars().count() < MIN_KEY_LEN {
        warnings.push(format!(
            "API key is shorter than {MIN_KEY_LEN} characters"
        ));
    }
    warnings
}

/// Keys shorter than this are starred out entirely.
const MASK_MIN_VISIBLE_LEN: usize = 16;

/// Show the first and last four characters only, and only for keys long
/// enough that at least half stays hidden.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < MASK_MIN_VISIBLE_LEN {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
