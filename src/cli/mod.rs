// src/cli/mod.rs - CLI definition (clap derive)

pub mod chat;
pub mod check;
pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::infra::config::Config;

#[derive(Parser)]
#[command(name = "chat-agent", about = "Terminal chat client for OpenAI-compatible models", version)]
pub struct Cli {
    /// Model to use (overrides config)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// API key (takes priority over the environment and the .env file)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// KEY=VALUE file to read the API key from
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// System prompt for the session
    #[arg(long, global = true)]
    pub system_prompt: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Interactive chat session (default)
    Chat,
    /// Verify the API key and make one test request
    Check,
}

impl Cli {
    /// Fold command-line overrides into the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref model) = self.model {
            config.session.model = model.clone();
        }
        if let Some(ref prompt) = self.system_prompt {
            config.session.system_prompt = prompt.clone();
        }
        if let Some(ref env_file) = self.env_file {
            config.credentials.env_file = env_file.clone();
        }
    }
}
