// src/infra/paths.rs - Config path management
//
// All paths respect the CHAT_AGENT_HOME environment variable for isolation.
// When unset, config lives under ~/.chat-agent/.

use std::path::PathBuf;

/// Returns the CHAT_AGENT_HOME override, if set.
fn chat_agent_home() -> Option<PathBuf> {
    std::env::var_os("CHAT_AGENT_HOME").map(PathBuf::from)
}

/// Home directory, if one can be determined.
pub fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Configuration directory: $CHAT_AGENT_HOME/ or ~/.chat-agent/
pub fn config_dir() -> PathBuf {
    if let Some(home) = chat_agent_home() {
        return home;
    }
    dirs_home()
        .map(|home| home.join(".chat-agent"))
        .unwrap_or_else(|| PathBuf::from(".chat-agent"))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default credential file, relative to the working directory.
pub fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}
