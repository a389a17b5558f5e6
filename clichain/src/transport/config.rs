//! Session configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::host::VariableStore;

/// Default directory served by the file-transfer server.
pub const DEFAULT_STAGING_ROOT: &str = "/tftpboot";

/// Host variable names read by [`SessionConfig::from_vars`].
pub mod keys {
    pub const OPERATOR_ID: &str = "userName";
    pub const WORKFLOW_NAME: &str = "workflowName";
    pub const SCRIPT_FILENAME: &str = "javax.script.filename";
    pub const ACTIVITY_NAME: &str = "activityName";
    pub const SERVER_ADDRESS: &str = "serverIP";
    pub const DEVICE_ADDRESS: &str = "deviceIP";
    pub const FAMILY: &str = "family";
}

/// Configuration for one CLI session.
///
/// Identity fields are optional: a session that never stages a warp batch
/// does not need them. [`SessionConfig::require`] turns a missing one into
/// a [`ConfigError::MissingVariable`] at the point of use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Identity of the operator running the script.
    #[serde(default)]
    pub operator_id: Option<String>,

    /// Name of the running script or workflow.
    #[serde(default)]
    pub script_name: Option<String>,

    /// Name of the workflow activity, if any.
    #[serde(default)]
    pub activity_name: Option<String>,

    /// Address of the file-transfer server, as seen from the device.
    #[serde(default)]
    pub server_address: Option<String>,

    /// Address of the target device.
    #[serde(default)]
    pub device_address: Option<String>,

    /// Device family name (e.g. "Fabric Engine").
    #[serde(default)]
    pub family: Option<String>,

    /// Local directory where warp batches are staged.
    #[serde(default = "default_staging_root")]
    pub staging_root: PathBuf,

    /// Log and record commands without sending them.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_staging_root() -> PathBuf {
    PathBuf::from(DEFAULT_STAGING_ROOT)
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            operator_id: None,
            script_name: None,
            activity_name: None,
            server_address: None,
            device_address: None,
            family: None,
            staging_root: default_staging_root(),
            dry_run: false,
        }
    }
}

impl SessionConfig {
    /// Build a configuration from the host variable store.
    ///
    /// The script name comes from `workflowName`, or else from the file
    /// stem of `javax.script.filename`.
    pub fn from_vars(vars: &impl VariableStore) -> Self {
        let script_name = vars.get(keys::WORKFLOW_NAME).or_else(|| {
            vars.get(keys::SCRIPT_FILENAME).and_then(|path| {
                Path::new(&path)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
        });

        Self {
            operator_id: vars.get(keys::OPERATOR_ID),
            script_name,
            activity_name: vars.get(keys::ACTIVITY_NAME),
            server_address: vars.get(keys::SERVER_ADDRESS),
            device_address: vars.get(keys::DEVICE_ADDRESS),
            family: vars.get(keys::FAMILY),
            ..Self::default()
        }
    }

    /// Unwrap an optional field, naming its host variable when missing.
    pub fn require<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, ConfigError> {
        value.ok_or_else(|| ConfigError::MissingVariable {
            key: key.to_string(),
        })
    }

    /// File name of the staged warp batch for this session.
    ///
    /// `{operator}.{script}.{device}` with every non-alphanumeric character
    /// of each part mapped to `_`.
    pub fn staging_file_name(&self) -> Result<String, ConfigError> {
        let operator = Self::require(self.operator_id.as_deref(), keys::OPERATOR_ID)?;
        let script = Self::require(self.script_name.as_deref(), keys::WORKFLOW_NAME)?;
        let device = Self::require(self.device_address.as_deref(), keys::DEVICE_ADDRESS)?;

        Ok([operator, script, device]
            .iter()
            .map(|part| normalize_name_part(part))
            .collect::<Vec<_>>()
            .join("."))
    }
}

fn normalize_name_part(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
