//! Builder for creating CLI sessions.

use std::path::PathBuf;

use log::error;

use super::session::CliSession;
use crate::channel::ErrorClassifier;
use crate::error::Result;
use crate::host::ResultsSink;
use crate::platform::{DeviceFamily, FamilyDefinition};
use crate::transport::{CliTransport, SessionConfig};

/// Builder for constructing CLI sessions.
///
/// # Example
///
/// ```rust,no_run
/// use clichain::{DeviceFamily, MemoryResults, SessionBuilder, SessionConfig};
/// # use clichain::{CliTransport, TransportError};
/// # struct HostCli;
/// # impl CliTransport for HostCli {
/// #     async fn send(&mut self, c: &str, _: bool) -> Result<String, TransportError> {
/// #         Ok(c.to_string())
/// #     }
/// # }
///
/// # async fn example() -> Result<(), clichain::Error> {
/// let config = SessionConfig {
///     operator_id: Some("admin".to_string()),
///     server_address: Some("10.0.0.10".to_string()),
///     device_address: Some("10.1.1.1".to_string()),
///     ..SessionConfig::default()
/// };
///
/// let mut session = SessionBuilder::new(HostCli)
///     .config(config)
///     .family(DeviceFamily::FabricEngine)
///     .results(MemoryResults::new())
///     .build()?;
///
/// session.send_command_chain("enable; config term").await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder<T: CliTransport> {
    transport: T,
    config: SessionConfig,
    family: Option<DeviceFamily>,
    classifier: Option<ErrorClassifier>,
    results: Option<Box<dyn ResultsSink>>,
}

impl<T: CliTransport> SessionBuilder<T> {
    /// Create a builder around a host transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: SessionConfig::default(),
            family: None,
            classifier: None,
            results: None,
        }
    }

    /// Set the session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the device family, overriding the configured family name.
    pub fn family(mut self, family: DeviceFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Log commands instead of sending them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Set the directory where warp batches are staged.
    pub fn staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.staging_root = root.into();
        self
    }

    /// Use a custom error classifier.
    pub fn classifier(mut self, classifier: ErrorClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the sink that receives fatal errors.
    pub fn results(mut self, results: impl ResultsSink + 'static) -> Self {
        self.results = Some(Box::new(results));
        self
    }

    /// Build the session.
    ///
    /// Resolves the device family; an unknown family name is fatal and
    /// reported to the results sink.
    pub fn build(mut self) -> Result<CliSession<T>> {
        let family = match self.resolve_family() {
            Ok(family) => family,
            Err(e) => {
                let message = e.to_string();
                error!("{}", message);
                if let Some(results) = self.results.as_mut() {
                    results.fail(&message);
                }
                return Err(e);
            }
        };

        Ok(CliSession::new(
            self.transport,
            self.config,
            family,
            self.classifier.unwrap_or_default(),
            self.results,
        ))
    }

    fn resolve_family(&self) -> Result<Option<FamilyDefinition>> {
        let family = match (self.family, self.config.family.as_deref()) {
            (Some(family), _) => family,
            (None, Some(name)) => name.parse::<DeviceFamily>()?,
            (None, None) => return Ok(None),
        };
        Ok(Some(family.definition()?))
    }
}
