//! Error types for clichain.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for clichain operations.
///
/// Every variant is fatal for the running script. Recoverable CLI errors
/// never surface here; they come back as `Ok(false)`, `Ok(None)` or
/// [`Value::None`](crate::channel::Value::None).
#[derive(Error, Debug)]
pub enum Error {
    /// The transport itself failed to deliver a command
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The device rejected a command and the caller did not opt into recovery
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Device family lookup or capability errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Regex query or output formatting errors
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Session configuration and staging errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Transport layer errors reported by the host session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The host transport reported a failure
    #[error("{message}")]
    Failed { message: String },

    /// Connection was closed unexpectedly.
    ///
    /// Host transports return this when the device session drops mid-command.
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out.
    ///
    /// Host transports return this when the device does not answer in time.
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// CLI-level errors detected in device output.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Output of a command matched the error vocabulary
    #[error("Command '{command}' failed:\n{output}")]
    CommandFailed { command: String, output: String },
}

/// Device family errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Family name is not in the family table
    #[error("Unknown device family '{name}'")]
    UnknownFamily { name: String },

    /// An operation needs a device family but none was configured
    #[error("Device family not set")]
    FamilyNotSet,

    /// The family has no templates for the requested feature
    #[error("Device family '{family}' does not support {feature}")]
    Unsupported { family: String, feature: String },

    /// Invalid family definition
    #[error("Invalid family definition: {message}")]
    InvalidDefinition { message: String },
}

/// Regex query and output formatting errors.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unrecognized format mode
    #[error("Invalid format mode '{mode}'")]
    InvalidMode { mode: String },

    /// Query text lacks the `||` pattern separator
    #[error("Malformed regex query '{query}'")]
    MalformedQuery { query: String },

    /// Query pattern does not compile
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// `int` mode capture is not an integer
    #[error("Capture '{value}' is not an integer")]
    InvalidInteger { value: String },

    /// A capture has fewer elements than the mode needs
    #[error("Mode '{mode}' cannot use capture {index}: needs {expected} elements")]
    CaptureShape {
        mode: String,
        index: usize,
        expected: usize,
    },
}

/// Session configuration and staging errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required host variable is missing
    #[error("Missing variable '{key}'")]
    MissingVariable { key: String },

    /// The warp staging file could not be written
    #[error("Unable to write to TFTP file '{}': {source}", path.display())]
    StagingWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using clichain's Error.
pub type Result<T> = std::result::Result<T, Error>;
