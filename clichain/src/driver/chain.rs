//! Command chain notation.
//!
//! A chain is a list of commands separated by `;` or newlines:
//!
//! ```text
//! vlan create 10 type port-mstprstp 0; vlan name 10 "users"
//! interface gigabitEthernet 1/1
//! default-vlan-id 10
//! ```
//!
//! A newline followed by a single word character and then a separator or
//! the end of the chain is not a separator: that character is a
//! confirmation answer belonging to the previous command, which keeps it
//! as a second line of its wire form.
//!
//! ```text
//! boot config flags tftpd
//! y
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::options::SendOptions;

const SENTINEL: char = '\0';

static PROTECTED_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(\w)(\r?\n|\s*;|$)").expect("protected newline pattern compiles"));

static SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[;\n]").expect("separator pattern compiles"));

static INLINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" +// +").expect("inline break pattern compiles"));

static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#error +(fail|stop|continue) *$").expect("directive pattern compiles")
});

/// Split a chain into its commands.
///
/// Fragments are trimmed and empty ones dropped. Parsing is idempotent:
/// joining the result with `;` and parsing again yields the same commands.
pub fn parse_chain(chain: &str) -> Vec<String> {
    let protected = PROTECTED_NEWLINE.replace_all(chain, "\u{0}${1}${2}");

    SEPARATOR
        .split(&protected)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| fragment.replace(SENTINEL, "\n"))
        .collect()
}

/// Expand the inline ` // ` notation into real newlines.
///
/// `reload // y` becomes `reload\ny`. A literal `://` is never touched.
pub fn wire_form(command: &str) -> String {
    let protected = command.replace("://", ":\u{0}\u{0}");
    INLINE_BREAK
        .replace_all(&protected, "\n")
        .replace(":\u{0}\u{0}", "://")
}

/// First line of a command, as recorded in history and warp batches.
pub fn display_form(command: &str) -> &str {
    command.split('\n').next().unwrap_or(command)
}

/// An `#error` directive embedded in a chain.
///
/// Directives change the error policy for the rest of the chain and are
/// never sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `#error fail`: CLI errors are fatal again.
    Fail,
    /// `#error stop`: CLI errors are recoverable and stop the chain.
    Stop,
    /// `#error continue`: CLI errors are recoverable and the chain goes on.
    Continue,
}

impl Directive {
    /// Recognize a directive line.
    pub fn parse(command: &str) -> Option<Self> {
        let caps = DIRECTIVE.captures(command)?;
        match &caps[1] {
            "fail" => Some(Directive::Fail),
            "stop" => Some(Directive::Stop),
            "continue" => Some(Directive::Continue),
            _ => None,
        }
    }

    /// Update an error policy.
    pub fn apply(self, options: &mut SendOptions) {
        options.return_cli_error = self != Directive::Fail;
        options.abort_on_error = self == Directive::Stop;
    }
}
