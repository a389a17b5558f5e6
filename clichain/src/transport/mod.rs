//! Host transport seam.
//!
//! The physical connection, prompt detection and raw send/receive belong
//! to the host environment. This module only defines the contract the
//! session drives, plus the session configuration.

pub mod config;
#[cfg(test)]
pub(crate) mod mock;

pub use config::SessionConfig;

use std::future::Future;

use crate::error::TransportError;

/// A host-supplied CLI transport bound to one device.
///
/// `send` transmits the full wire form of a command (possibly several
/// lines) and returns the raw device output, including the echoed command
/// and the trailing prompt. When `wait_for_prompt` is false the transport
/// returns as soon as the input is written, for commands that leave the
/// device without a regular prompt (reboots, sub-prompts).
///
/// An `Err` means the transport itself failed; it is always fatal for the
/// script. CLI-level errors arrive as ordinary output in `Ok`.
pub trait CliTransport: Send {
    /// Send a command and collect its output.
    fn send(
        &mut self,
        command: &str,
        wait_for_prompt: bool,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}
