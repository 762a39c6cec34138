// src/util.rs - Shared utility functions

/// Cut `s` to at most `max_chars` characters, appending `...` when
/// anything was removed. Counts characters, not bytes.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}...", &s[..end]),
    }
}
