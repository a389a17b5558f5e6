//! # Clichain
//!
//! Async command-chain execution engine for network device configuration.
//!
//! Clichain sits on top of a CLI transport supplied by the host (the
//! connection, prompt detection and raw send/receive are not its business)
//! and turns compact, human-written command notation into sequenced device
//! interactions.
//!
//! ## Features
//!
//! - Command chains with `;`/newline separators, embedded confirmations
//!   and `#error fail|stop|continue` directives
//! - CLI error classification with an allow-list for benign messages
//! - Regex queries (`mode://cmd1&cmd2||pattern`) formatted into typed values
//! - Indented execution summaries following configuration contexts
//! - Warp buffer: batched delivery through a staged file and one remote
//!   execute command
//! - Device family table (Fabric Engine, Summit Series, ERS Series, ISW)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clichain::{CliTransport, DeviceFamily, SessionBuilder, TransportError, Value};
//!
//! struct HostCli;
//!
//! impl CliTransport for HostCli {
//!     async fn send(&mut self, command: &str, _wait: bool) -> Result<String, TransportError> {
//!         // hand the command to the host session here
//!         Ok(format!("{command}\nswitch:1#"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), clichain::Error> {
//!     let mut session = SessionBuilder::new(HostCli)
//!         .family(DeviceFamily::FabricEngine)
//!         .build()?;
//!
//!     let enabled = session
//!         .send_command_regex("bool://show boot config flags||^flags tftpd true")
//!         .await?;
//!     if enabled == Value::Bool(false) {
//!         session.send_command_chain("enable; config term; boot config flags tftpd").await?;
//!     }
//!
//!     session.print_summary();
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod host;
pub mod platform;
pub mod transport;

// Re-export main types for convenience
pub use channel::{Capture, ErrorClassifier, FormatMode, RegexQuery, Value};
pub use driver::{CliSession, OutputRecord, ScriptBanner, SendOptions, SessionBuilder, Summary};
pub use error::{Error, Result, TransportError};
pub use host::{MemoryResults, ResultsSink, ScriptStatus, VariableStore};
pub use platform::{DeviceFamily, FamilyDefinition};
pub use transport::{CliTransport, SessionConfig};
