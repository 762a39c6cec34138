// src/cli/commands.rs - Slash command parsing

use std::path::PathBuf;

/// What one line of REPL input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line, nothing to do.
    Empty,
    /// Text for the model.
    Message(String),
    Command(ChatCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Save(Option<PathBuf>),
    Clear,
    History,
    Security,
    Quit,
    Unknown(String),
}

/// Classify a raw input line. Command names are case-insensitive; the
/// `/save` argument keeps its case.
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    if !trimmed.starts_with('/') {
        return Input::Message(trimmed.to_string());
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (trimmed, ""),
    };

    let command = match cmd.to_lowercase().as_str() {
        "/help" => ChatCommand::Help,
        "/save" => ChatCommand::Save((!arg.is_empty()).then(|| PathBuf::from(arg))),
        "/clear" => ChatCommand::Clear,
        "/history" => ChatCommand::History,
        "/security" => ChatCommand::Security,
        "/quit" | "/exit" => ChatCommand::Quit,
        _ => ChatCommand::Unknown(trimmed.to_string()),
    };
    Input::Command(command)
}

pub const HELP_TEXT: &str = "\
Commands:
  /help              Show this help message
  /save [filename]   Save conversation to a JSON file
  /clear             Clear conversation history
  /history           Show conversation history
  /security          Show API key and file permission status
  /quit, /exit       Exit the chat agent

Just type your message to chat with the AI!";
