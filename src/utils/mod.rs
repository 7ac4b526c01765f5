//! Shared utility functions.

mod format;

pub use format::{char_prefix, truncate_chars, value_to_string};
