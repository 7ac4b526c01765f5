//! Formatting utilities.

/// Longest prefix of `s` holding at most `max_chars` characters.
pub fn char_prefix(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Text form of a JSON scalar: strings verbatim, anything else as JSON.
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncate to `max_chars` characters, appending `...` when anything was cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    let prefix = char_prefix(s, max_chars);
    if prefix.len() < s.len() {
        format!("{}...", prefix)
    } else {
        s.to_string()
    }
}
