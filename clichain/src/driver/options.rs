//! Per-call error policy and prompt handling.

/// Options for sending commands.
///
/// The defaults make every CLI error fatal, stop a chain at its first
/// failure, and wait for the device prompt.
///
/// # Example
///
/// ```rust
/// use clichain::SendOptions;
///
/// // Check for a feature: a CLI error just means "not there".
/// let lenient = SendOptions::new()
///     .with_return_cli_error(true)
///     .with_msg_on_error("feature not licensed, skipping");
/// assert!(lenient.wait_for_prompt);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    /// Return a failure value on CLI errors instead of terminating.
    pub return_cli_error: bool,

    /// Message logged when a CLI error is ignored.
    pub msg_on_error: Option<String>,

    /// Wait for the device prompt after sending.
    pub wait_for_prompt: bool,

    /// Stop a chain at its first failed command.
    pub abort_on_error: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            return_cli_error: false,
            msg_on_error: None,
            wait_for_prompt: true,
            abort_on_error: true,
        }
    }
}

impl SendOptions {
    /// Create options with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that turn CLI errors into failure values.
    pub fn recoverable() -> Self {
        Self::default().with_return_cli_error(true)
    }

    pub fn with_return_cli_error(mut self, return_cli_error: bool) -> Self {
        self.return_cli_error = return_cli_error;
        self
    }

    pub fn with_msg_on_error(mut self, message: impl Into<String>) -> Self {
        self.msg_on_error = Some(message.into());
        self
    }

    pub fn with_wait_for_prompt(mut self, wait_for_prompt: bool) -> Self {
        self.wait_for_prompt = wait_for_prompt;
        self
    }

    pub fn with_abort_on_error(mut self, abort_on_error: bool) -> Self {
        self.abort_on_error = abort_on_error;
        self
    }
}
