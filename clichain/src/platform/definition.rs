//! Family definitions: context patterns and transfer templates.

use std::fmt;

use regex::Regex;

use super::registry::DeviceFamily;
use crate::error::PlatformError;

/// Commands that leave one configuration context, for every family.
pub const CONTEXT_EXIT_PATTERN: &str = r"^ *(?:exit|back|end|config|save)(?:\s|$)";

/// Placeholder for the file-transfer server address in an execute template.
pub const SERVER_SLOT: &str = "{server}";

/// Placeholder for the staged file name in an execute template.
pub const FILE_SLOT: &str = "{file}";

/// Definition of one device family.
///
/// `context_patterns[n]` matches the commands that enter nesting depth
/// `n + 1` from depth `n`.
#[derive(Clone)]
pub struct FamilyDefinition {
    /// Family this definition belongs to.
    pub family: DeviceFamily,

    /// Context-entry patterns, indexed by current depth.
    pub context_patterns: Vec<Regex>,

    /// Warp buffer transfer templates, if the family supports it.
    pub transfer: Option<TransferTemplates>,
}

impl FamilyDefinition {
    /// Create a definition with no context patterns and no transfer support.
    pub fn new(family: DeviceFamily) -> Self {
        Self {
            family,
            context_patterns: Vec::new(),
            transfer: None,
        }
    }

    /// Add the context-entry pattern for the next depth.
    pub fn with_context_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.context_patterns.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Set the transfer templates.
    pub fn with_transfer(mut self, transfer: TransferTemplates) -> Self {
        self.transfer = Some(transfer);
        self
    }

    /// Deepest nesting the context patterns describe.
    pub fn max_depth(&self) -> usize {
        self.context_patterns.len()
    }

    /// Transfer templates, or an error if the family has none.
    pub fn transfer_templates(&self) -> Result<&TransferTemplates, PlatformError> {
        self.transfer
            .as_ref()
            .ok_or_else(|| PlatformError::Unsupported {
                family: self.family.to_string(),
                feature: "warp buffer transfer".to_string(),
            })
    }
}

impl fmt::Debug for FamilyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyDefinition")
            .field("family", &self.family)
            .field(
                "context_patterns",
                &self
                    .context_patterns
                    .iter()
                    .map(Regex::as_str)
                    .collect::<Vec<_>>(),
            )
            .field("transfer", &self.transfer)
            .finish()
    }
}

/// How to find out whether the device's file-transfer service is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferCheck {
    /// The service is always available.
    AlwaysActive,

    /// Regex query whose truthy result means the service is running.
    Query(String),
}

/// Family-specific commands of the warp buffer protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTemplates {
    /// Capability check.
    pub check: TransferCheck,

    /// Command that starts the transfer service.
    pub activate: Option<String>,

    /// Command that stops it again, delivered inside the batch.
    pub deactivate: Option<String>,

    /// Command chain that fetches and runs the staged file.
    /// Contains [`SERVER_SLOT`] and [`FILE_SLOT`].
    pub execute: String,

    /// Lines written at the top of the staged file.
    pub bootstrap: Vec<String>,
}

impl TransferTemplates {
    /// Create templates for an always-active service.
    pub fn new(execute: impl Into<String>) -> Self {
        Self {
            check: TransferCheck::AlwaysActive,
            activate: None,
            deactivate: None,
            execute: execute.into(),
            bootstrap: Vec::new(),
        }
    }

    /// Check the service with a regex query.
    pub fn with_check_query(mut self, query: impl Into<String>) -> Self {
        self.check = TransferCheck::Query(query.into());
        self
    }

    /// Set the service activation and deactivation commands.
    pub fn with_service(
        mut self,
        activate: impl Into<String>,
        deactivate: impl Into<String>,
    ) -> Self {
        self.activate = Some(activate.into());
        self.deactivate = Some(deactivate.into());
        self
    }

    /// Add a bootstrap line.
    pub fn with_bootstrap(mut self, line: impl Into<String>) -> Self {
        self.bootstrap.push(line.into());
        self
    }

    /// Render the execute chain for a server address and file name.
    pub fn execute_command(&self, server: &str, file: &str) -> String {
        self.execute
            .replace(SERVER_SLOT, server)
            .replace(FILE_SLOT, file)
    }
}
