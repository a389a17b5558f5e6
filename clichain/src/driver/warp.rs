//! Warp buffer: batched delivery of commands through a staged file.
//!
//! Instead of sending commands one by one, a warp batch is written to a
//! file served by the file-transfer server, and a single family-specific
//! command makes the device fetch and run it.
//!
//! ```text
//! 1. check the transfer service, start it if needed
//!    (its stop command is queued as the last line of the batch)
//! 2. stage {stagingRoot}/{operator}.{script}.{device}
//! 3. send the execute chain, remove the file, clear the buffer
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, warn};

use super::chain::{display_form, parse_chain};
use super::options::SendOptions;
use super::session::CliSession;
use crate::error::{ConfigError, PlatformError, Result};
use crate::platform::TransferCheck;
use crate::transport::CliTransport;
use crate::transport::config::keys;

/// Commands queued for the next warp execution, as display forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarpBuffer {
    commands: Vec<String>,
}

impl WarpBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every command of a chain.
    pub fn add_chain(&mut self, chain: &str) {
        self.commands.extend(
            parse_chain(chain)
                .iter()
                .map(|command| display_form(command).to_string()),
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// A staged batch file, removed when the guard goes away.
///
/// Call [`StagedFile::remove`] to observe removal errors; dropping the
/// guard removes the file too, with a warning.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    removed: bool,
}

impl StagedFile {
    /// Write `lines`, one per line, followed by an empty line.
    pub fn write<'a>(
        path: impl Into<PathBuf>,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> io::Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        let guard = Self {
            path,
            removed: false,
        };

        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{}", line)?;
        }
        writeln!(writer)?;
        writer.flush()?;

        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now.
    pub fn remove(mut self) -> io::Result<()> {
        self.removed = true;
        fs::remove_file(&self.path)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.removed {
            warn!(
                "Staged file {} dropped without explicit removal",
                self.path.display()
            );
            let _ = fs::remove_file(&self.path);
        }
    }
}

impl<T: CliTransport> CliSession<T> {
    /// Queue a chain for the next warp execution. Nothing is sent.
    pub fn warp_buffer_add(&mut self, chain: &str) {
        self.warp_buffer.add_chain(chain);
    }

    /// Deliver the warp buffer with the default options.
    pub async fn warp_buffer_execute(&mut self, chain: Option<&str>) -> Result<bool> {
        self.warp_buffer_execute_with(chain, &SendOptions::default())
            .await
    }

    /// Deliver the warp buffer, after queueing `chain` if given.
    ///
    /// Returns the result of the execute chain, sent with `options`. The
    /// buffer is cleared after every attempt, and the staged file removed,
    /// whatever the result. A family without transfer support, a missing
    /// host variable or an unwritable staging file is fatal; these are
    /// detected before anything is sent to the device.
    pub async fn warp_buffer_execute_with(
        &mut self,
        chain: Option<&str>,
        options: &SendOptions,
    ) -> Result<bool> {
        if let Some(chain) = chain {
            self.warp_buffer_add(chain);
        }

        let outcome = self.deliver_warp_buffer(options).await;
        self.warp_buffer.clear();

        let success = outcome?;
        if success {
            self.last_error = None;
        }
        Ok(success)
    }

    async fn deliver_warp_buffer(&mut self, options: &SendOptions) -> Result<bool> {
        let templates = match self.family() {
            Some(family) => family.transfer_templates().cloned(),
            None => Err(PlatformError::FamilyNotSet),
        };
        let templates = templates.map_err(|e| self.terminate(e))?;

        let file_name = self
            .config()
            .staging_file_name()
            .map_err(|e| self.terminate(e))?;
        let server = self
            .config()
            .server_address
            .clone()
            .ok_or_else(|| ConfigError::MissingVariable {
                key: keys::SERVER_ADDRESS.to_string(),
            })
            .map_err(|e| self.terminate(e))?;
        let path = self.config().staging_root.join(&file_name);

        let active = match &templates.check {
            TransferCheck::AlwaysActive => true,
            TransferCheck::Query(query) => self.send_command_regex(query).await?.is_truthy(),
        };
        if !active {
            if let Some(activate) = &templates.activate {
                self.send_command(activate).await?;
            }
            if let Some(deactivate) = &templates.deactivate {
                self.warp_buffer_add(deactivate);
            }
        }

        let lines = templates
            .bootstrap
            .iter()
            .map(String::as_str)
            .chain(self.warp_buffer.iter());
        let staged = match StagedFile::write(&path, lines) {
            Ok(staged) => staged,
            Err(source) => {
                return Err(self.terminate(ConfigError::StagingWrite { path, source }));
            }
        };
        debug!(
            "warpBuffer - write of TFTP config file: {}",
            staged.path().display()
        );

        let outcome = self
            .send_command_chain_with(&templates.execute_command(&server, &file_name), options)
            .await;

        match staged.remove() {
            Ok(()) => debug!("warpBuffer - delete of TFTP config file : {}", path.display()),
            Err(e) => error!("Unable to delete TFTP file '{}': {}", path.display(), e),
        }
        outcome
    }
}
