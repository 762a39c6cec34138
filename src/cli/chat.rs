// src/cli/chat.rs - Interactive REPL

use std::path::Path;

use super::commands::{parse_input, ChatCommand, Input, HELP_TEXT};
use crate::core::session::Session;
use crate::core::transcript;
use crate::infra::config::Config;
use crate::security::permissions;

/// History listings cut each message to this many characters.
const HISTORY_PREVIEW_CHARS: usize = 100;

/// Whether the loop should keep reading after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the interactive chat REPL until `/quit` or EOF.
///
/// `config_path` is the file the configuration was loaded from; `/security`
/// audits that file.
pub async fn run_chat(
    session: &mut Session,
    config: &Config,
    config_path: &Path,
) -> anyhow::Result<()> {
    eprintln!(
        "chat-agent v{} | {} | key from {}",
        env!("CARGO_PKG_VERSION"),
        session.model_id(),
        session.credential().source(),
    );
    eprintln!("Type /help for available commands, /quit to exit.\n");

    while let Some(line) = read_input() {
        match parse_input(&line) {
            Input::Empty => continue,
            Input::Command(cmd) => {
                if handle_command(cmd, session, config, config_path) == Flow::Quit {
                    break;
                }
            }
            Input::Message(text) => match session.submit_user_turn(&text).await {
                Ok(reply) => println!("AI: {}", reply),
                Err(e) => println!("AI: {}", e.user_message()),
            },
        }
    }

    eprintln!("\nGoodbye! Thanks for chatting!");
    Ok(())
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("\nYou: ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(e) => {
            tracing::warn!("Failed to read input: {}", e);
            None
        }
    }
}

fn handle_command(
    cmd: ChatCommand,
    session: &mut Session,
    config: &Config,
    config_path: &Path,
) -> Flow {
    match cmd {
        ChatCommand::Help => eprintln!("{}", HELP_TEXT),

        ChatCommand::Save(path) => {
            let history = session.export();
            match transcript::save(&history, path.as_deref()) {
                Ok(written) => eprintln!("Conversation saved to {}", written.display()),
                Err(e) => eprintln!("Error saving conversation: {}", e),
            }
        }

        ChatCommand::Clear => {
            session.clear();
            eprintln!("Conversation history cleared!");
        }

        ChatCommand::History => {
            for line in history_lines(session) {
                eprintln!("{}", line);
            }
        }

        ChatCommand::Security => {
            let report = security_report(session, &config.credentials.env_file, config_path);
            for line in report {
                eprintln!("{}", line);
            }
        }

        ChatCommand::Quit => return Flow::Quit,

        ChatCommand::Unknown(input) => {
            eprintln!("Unknown command: {}. Type /help for commands.", input);
        }
    }
    Flow::Continue
}

fn history_lines(session: &Session) -> Vec<String> {
    if session.is_empty() {
        return vec!["No conversation history yet.".to_string()];
    }
    let rule = "-".repeat(50);
    let mut lines = vec!["Conversation History:".to_string(), rule.clone()];
    lines.extend(
        session
            .summarize(HISTORY_PREVIEW_CHARS)
            .iter()
            .map(|l| l.to_string()),
    );
    lines.push(rule);
    lines
}

/// Key source, masked key, key-shape warnings and file permissions.
pub fn security_report(session: &Session, env_file: &Path, config_file: &Path) -> Vec<String> {
    let credential = session.credential();
    let mut lines = vec![
        "Security status:".to_string(),
        format!("  API key source: {}", credential.source()),
        format!("  API key: {}", credential.masked()),
    ];

    let warnings = credential.warnings();
    if warnings.is_empty() {
        lines.push("  Key format: OK".to_string());
    } else {
        for w in warnings {
            lines.push(format!("  Key format warning: {}", w));
        }
    }

    for check in permissions::audit_permissions(env_file, config_file) {
        let marker = if check.is_secure { "ok" } else { "WARN" };
        lines.push(format!("  [{}] {} ({})", marker, check.message, check.path));
    }
    lines.push("  Never commit your .env file or share your API key.".to_string());
    lines
}
