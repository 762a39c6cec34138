// src/main.rs - chat-agent entry point

use std::sync::Arc;

use clap::Parser;

use chat_agent::cli::{Cli, Commands};
use chat_agent::core::session::{Session, SessionOptions};
use chat_agent::core::types::SessionSettings;
use chat_agent::infra::config::Config;
use chat_agent::infra::errors::ChatError;
use chat_agent::infra::logger;
use chat_agent::infra::paths;
use chat_agent::provider::openai::OpenAIProvider;
use chat_agent::provider::CompletionProvider;
use chat_agent::security::credentials::CredentialResolver;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        if let Some(ChatError::CredentialMissing) = e.downcast_ref::<ChatError>() {
            print_key_help();
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let (mut config, config_path) = match cli.config {
        Some(ref path) => (Config::load_from(path)?, path.clone()),
        None => (Config::load()?, paths::config_file_path()),
    };
    cli.apply_overrides(&mut config);

    match cli.command {
        Some(Commands::Check) => chat_agent::cli::check::run_check(&config, cli.api_key).await,
        Some(Commands::Chat) | None => {
            let resolver =
                CredentialResolver::from_config(&config.credentials).with_explicit(cli.api_key);
            let options = SessionOptions::new(
                config.session.model.clone(),
                config.session.system_prompt.clone(),
            )
            .with_settings(SessionSettings::from(&config.session));

            let provider_config = config.provider.clone();
            let mut session = Session::create(options, &resolver, |credential| {
                Arc::new(OpenAIProvider::from_config(
                    credential.expose().to_string(),
                    &provider_config,
                )) as Arc<dyn CompletionProvider>
            })?;

            chat_agent::cli::chat::run_chat(&mut session, &config, &config_path).await
        }
    }
}

fn print_key_help() {
    eprintln!("error: OpenAI API key not found!");
    eprintln!("Set your API key in one of these ways:");
    eprintln!("  1. Pass it with --api-key");
    eprintln!("  2. Set the OPENAI_API_KEY environment variable");
    eprintln!("  3. Create a .env file with OPENAI_API_KEY=your_key_here");
}
