//! Basic statistics over a text.

use serde::{Deserialize, Serialize};

/// Word, character and line counts of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStatistics {
    /// Whitespace-delimited tokens.
    pub word_count: usize,
    /// Characters in the raw text, whitespace included.
    pub char_count: usize,
    /// Lines, counting a trailing line without terminator.
    pub line_count: usize,
}

/// Computes [`TextStatistics`]. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextAnalyzer;

impl TextAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> TextStatistics {
        TextStatistics {
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            line_count: count_lines(text),
        }
    }
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// Number of segments produced by splitting on line boundaries. `\r\n` is a
/// single boundary and a terminator at the very end does not open a new line.
fn count_lines(text: &str) -> usize {
    let mut lines = 0;
    let mut in_line = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if is_line_boundary(c) {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            lines += 1;
            in_line = false;
        } else {
            in_line = true;
        }
    }

    if in_line {
        lines += 1;
    }
    lines
}
