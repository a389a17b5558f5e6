//! Output handling for device responses.
//!
//! Cleaning and error classification of raw output, the regex query
//! notation, and the format modes that turn captures into values.

pub mod format;
mod patterns;
mod query;

pub use format::{Capture, FormatMode, Value, find_all, format_captures};
pub use patterns::{
    DEFAULT_ALLOW_PATTERN, DEFAULT_ERROR_PATTERN, ERROR_HEAD_LINES, ErrorClassifier,
    clean_output, is_prompt_line,
};
pub use query::RegexQuery;
