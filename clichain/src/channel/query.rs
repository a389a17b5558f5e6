//! Regex query notation: `[mode://]cmd1[&cmd2...]||pattern`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FormatError;

static MODE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+(?:-\w+)?://").expect("mode prefix pattern compiles"));

/// A parsed regex query.
///
/// `alternatives` are tried in order until one produces output; `pattern`
/// is then searched over that output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexQuery {
    /// Format mode name, `None` for raw captures.
    pub mode: Option<String>,

    /// Commands to try, in order.
    pub alternatives: Vec<String>,

    /// Pattern applied with multiline find-all semantics.
    pub pattern: String,
}

impl RegexQuery {
    /// Parse query text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clichain::channel::RegexQuery;
    ///
    /// let query = RegexQuery::parse("bool://show boot config flags||^flags tftpd true").unwrap();
    /// assert_eq!(query.mode.as_deref(), Some("bool"));
    /// assert_eq!(query.alternatives, vec!["show boot config flags"]);
    /// assert_eq!(query.pattern, "^flags tftpd true");
    /// ```
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let (mode, rest) = match MODE_PREFIX.find(text) {
            Some(m) => {
                let mode = text[..m.end() - 3].trim().to_string();
                (Some(mode), &text[m.end()..])
            }
            None => (None, text),
        };

        let (commands, pattern) = rest
            .split_once("||")
            .ok_or_else(|| FormatError::MalformedQuery {
                query: text.to_string(),
            })?;

        let alternatives = commands
            .trim()
            .split('&')
            .map(|cmd| cmd.trim().to_string())
            .collect();

        Ok(Self {
            mode,
            alternatives,
            pattern: pattern.trim().to_string(),
        })
    }
}
