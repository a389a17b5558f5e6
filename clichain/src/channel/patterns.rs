//! Output cleaning and CLI error classification.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Number of leading output lines inspected for error banners.
pub const ERROR_HEAD_LINES: usize = 4;

/// Words and markers that indicate a CLI error.
pub const DEFAULT_ERROR_PATTERN: &str = r"^%|\x07|error|invalid|cannot|unable|bad|not found|not exist|not allowed|no such|out of range|incomplete|failed|denied|can't|ambiguous|do not|unrecognized";

/// Benign device messages that contain error vocabulary.
pub const DEFAULT_ALLOW_PATTERN: &str = r"(?:Both ends of MACsec link cannot have the same key-parity value|% Saving \d+ bytes to flash:startup-config)";

static PROMPT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*[?$%#>]\s?$").expect("prompt line pattern compiles"));

static DEFAULT_CLASSIFIER: Lazy<ErrorClassifier> = Lazy::new(|| {
    ErrorClassifier::new(DEFAULT_ERROR_PATTERN, DEFAULT_ALLOW_PATTERN)
        .expect("default classifier patterns compile")
});

/// Decides whether device output is a CLI error.
///
/// Output is an error when the error pattern matches and the allow pattern
/// does not match anywhere. Both are compiled case-insensitive and
/// multiline.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    error: Regex,
    allow: Regex,
}

impl ErrorClassifier {
    /// Create a classifier from an error pattern and an allow-list pattern.
    pub fn new(error: &str, allow: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            error: compile(error)?,
            allow: compile(allow)?,
        })
    }

    /// Check whether `output` is an error.
    pub fn is_error(&self, output: &str) -> bool {
        self.error.is_match(output) && !self.allow.is_match(output)
    }

    /// Classify cleaned command output, looking only at its first lines.
    ///
    /// Empty output is never an error.
    pub fn is_error_output(&self, cleaned: &str) -> bool {
        if cleaned.is_empty() {
            return false;
        }
        let head = cleaned
            .split('\n')
            .take(ERROR_HEAD_LINES)
            .collect::<Vec<_>>()
            .join("\n");
        self.is_error(&head)
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
}

/// Check whether a line looks like a device prompt.
pub fn is_prompt_line(line: &str) -> bool {
    PROMPT_LINE.is_match(line)
}

/// Strip the echoed command and the trailing prompt from raw output.
///
/// Output starting with `Error:` is a transport-side report and passes
/// through unchanged. Otherwise the first line is always dropped and the
/// last line only when it is a prompt.
pub fn clean_output(raw: &str) -> String {
    if raw.starts_with("Error:") {
        return raw.to_string();
    }

    let mut lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .skip(1)
        .collect();

    if lines.last().is_some_and(|last| is_prompt_line(last)) {
        lines.pop();
    }

    lines.join("\n")
}
