//! CLI session: command execution against one device.

use std::time::Instant;

use log::{debug, error, info};
use regex::RegexBuilder;

use super::chain::{Directive, display_form, parse_chain, wire_form};
use super::history::CommandHistory;
use super::options::SendOptions;
use super::response::OutputRecord;
use super::warp::WarpBuffer;
use crate::channel::{ErrorClassifier, FormatMode, RegexQuery, Value, find_all};
use crate::error::{DeviceError, Error, FormatError, Result};
use crate::host::ResultsSink;
use crate::platform::FamilyDefinition;
use crate::transport::{CliTransport, SessionConfig};

/// A CLI session driving one device.
///
/// The session owns the command history and the warp buffer of its run.
/// Operations take `&mut self`, so exactly one command is in flight at a
/// time.
///
/// Recoverable CLI errors come back as `Ok(false)`, `Ok(None)` or
/// `Ok(Value::None)`. Every `Err` has already been published to the
/// results sink by [`CliSession::terminate`].
pub struct CliSession<T: CliTransport> {
    transport: T,
    config: SessionConfig,
    family: Option<FamilyDefinition>,
    classifier: ErrorClassifier,
    results: Option<Box<dyn ResultsSink>>,
    pub(super) history: CommandHistory,
    pub(super) warp_buffer: WarpBuffer,
    pub(super) last_error: Option<String>,
    last_output: Option<OutputRecord>,
}

impl<T: CliTransport> CliSession<T> {
    pub(super) fn new(
        transport: T,
        config: SessionConfig,
        family: Option<FamilyDefinition>,
        classifier: ErrorClassifier,
        results: Option<Box<dyn ResultsSink>>,
    ) -> Self {
        Self {
            transport,
            config,
            family,
            classifier,
            results,
            history: CommandHistory::new(),
            warp_buffer: WarpBuffer::new(),
            last_error: None,
            last_output: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Definition of the device family, if one was configured.
    pub fn family(&self) -> Option<&FamilyDefinition> {
        self.family.as_ref()
    }

    /// Commands executed since the last summary.
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Commands queued for the next warp execution.
    pub fn warp_buffer(&self) -> &WarpBuffer {
        &self.warp_buffer
    }

    /// Cleaned output of the most recent ignored CLI error.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Output of the most recent command that the device accepted.
    ///
    /// Commands skipped in dry-run mode and commands whose output was
    /// classified as an error leave it unchanged.
    pub fn last_output(&self) -> Option<&OutputRecord> {
        self.last_output.as_ref()
    }

    /// Report a fatal error and hand it back for propagation.
    ///
    /// The message is logged and published to the results sink together
    /// with a failure status.
    pub fn terminate(&mut self, error: impl Into<Error>) -> Error {
        let error = error.into();
        let message = error.to_string();
        error!("{}", message);
        if let Some(results) = self.results.as_mut() {
            results.fail(&message);
        }
        error
    }

    /// Send a command with the default options.
    pub async fn send_command(&mut self, command: &str) -> Result<bool> {
        self.send_command_with(command, &SendOptions::default()).await
    }

    /// Send a command.
    ///
    /// ` // ` in the command becomes a newline on the wire, so
    /// `delete file.cfg // y` answers the confirmation prompt. Returns
    /// `Ok(false)` when the device reports an error and
    /// `options.return_cli_error` is set.
    pub async fn send_command_with(&mut self, command: &str, options: &SendOptions) -> Result<bool> {
        let wire = wire_form(command);
        let display = display_form(&wire).to_string();

        if self.config.dry_run {
            info!("SANITY > {}", wire);
            self.history.push(display);
            self.last_error = None;
            return Ok(true);
        }

        match self.exchange(&wire, options, options.wait_for_prompt).await? {
            Some(_) => {
                self.history.push(display);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Send a command chain with the default options.
    pub async fn send_command_chain(&mut self, chain: &str) -> Result<bool> {
        self.send_command_chain_with(chain, &SendOptions::default())
            .await
    }

    /// Send every command of a chain in order.
    ///
    /// `#error fail|stop|continue` lines change the error policy for the
    /// rest of the chain. Only the last command uses the caller's
    /// `wait_for_prompt`. The result is `false` if the last command failed
    /// or any earlier command failed without aborting the chain.
    pub async fn send_command_chain_with(
        &mut self,
        chain: &str,
        options: &SendOptions,
    ) -> Result<bool> {
        let commands = parse_chain(chain);
        let Some((last, rest)) = commands.split_last() else {
            return Ok(true);
        };

        let mut policy = options.clone().with_wait_for_prompt(true);
        let mut success = true;

        for command in rest {
            if let Some(directive) = Directive::parse(command) {
                debug!("Chain error policy now {:?}", directive);
                directive.apply(&mut policy);
                continue;
            }
            if !self.send_command_with(command, &policy).await? {
                success = false;
                if policy.abort_on_error {
                    return Ok(false);
                }
            }
        }

        let policy = policy.with_wait_for_prompt(options.wait_for_prompt);
        if !self.send_command_with(last, &policy).await? {
            return Ok(false);
        }
        Ok(success)
    }

    /// Send a show command with the default options.
    pub async fn send_command_show(&mut self, command: &str) -> Result<Option<String>> {
        self.send_command_show_with(command, &SendOptions::default())
            .await
    }

    /// Send a command and return its cleaned output.
    ///
    /// Always waits for the prompt. Show commands are not recorded in the
    /// history and are sent even in dry-run mode.
    pub async fn send_command_show_with(
        &mut self,
        command: &str,
        options: &SendOptions,
    ) -> Result<Option<String>> {
        let wire = wire_form(command);
        let record = self.exchange(&wire, options, true).await?;
        Ok(record.map(|record| record.cleaned))
    }

    /// Run a regex query with the default options.
    pub async fn send_command_regex(&mut self, query: &str) -> Result<Value> {
        self.send_command_regex_with(query, &SendOptions::default())
            .await
    }

    /// Run a regex query: `[mode://]cmd1[&cmd2...]||pattern`.
    ///
    /// Alternatives are tried in order until one produces output; errors
    /// of all but the last are ignored. The pattern is searched over that
    /// output and the captures formatted by the mode. No output at all
    /// yields [`Value::None`].
    ///
    /// A malformed query, bad pattern or unknown mode is fatal.
    pub async fn send_command_regex_with(
        &mut self,
        query: &str,
        options: &SendOptions,
    ) -> Result<Value> {
        let query = RegexQuery::parse(query).map_err(|e| self.terminate(e))?;
        let mode =
            FormatMode::parse_optional(query.mode.as_deref()).map_err(|e| self.terminate(e))?;
        let pattern = RegexBuilder::new(&query.pattern)
            .multi_line(true)
            .build()
            .map_err(|e| self.terminate(FormatError::from(e)))?;

        let last = query.alternatives.len().saturating_sub(1);
        let mut output = None;
        for (index, command) in query.alternatives.iter().enumerate() {
            let attempt = if index < last {
                options.clone().with_return_cli_error(true)
            } else {
                options.clone()
            };
            output = self.send_command_show_with(command, &attempt).await?;
            if output.as_deref().is_some_and(|text| !text.is_empty()) {
                break;
            }
        }

        let Some(output) = output.filter(|text| !text.is_empty()) else {
            return Ok(Value::None);
        };

        let captures = find_all(&pattern, &output);
        debug!("sendCommandRegex() raw data = {:?}", captures);

        let value = match mode {
            Some(mode) => mode.apply(captures),
            None => Ok(Value::List(captures)),
        };
        value.map_err(|e| self.terminate(e))
    }

    /// Send one wire command and classify its output.
    ///
    /// `Ok(None)` is an ignored CLI error.
    async fn exchange(
        &mut self,
        wire: &str,
        options: &SendOptions,
        wait_for_prompt: bool,
    ) -> Result<Option<OutputRecord>> {
        let record = self.transmit(wire, wait_for_prompt).await?;

        if self.classifier.is_error_output(&record.cleaned) {
            if !options.return_cli_error {
                return Err(self.terminate(DeviceError::CommandFailed {
                    command: wire.to_string(),
                    output: record.cleaned,
                }));
            }
            if let Some(message) = &options.msg_on_error {
                error!("Ignoring above error: {}", message);
            }
            self.last_error = Some(record.cleaned);
            return Ok(None);
        }

        self.last_error = None;
        self.last_output = Some(record.clone());
        Ok(Some(record))
    }

    async fn transmit(&mut self, wire: &str, wait_for_prompt: bool) -> Result<OutputRecord> {
        debug!("Execute command : {}", wire);
        let start = Instant::now();
        match self.transport.send(wire, wait_for_prompt).await {
            Ok(raw) => {
                let record = OutputRecord::new(wire, raw, start.elapsed());
                debug!("Command '{}' answered in {:?}", record.command, record.elapsed);
                Ok(record)
            }
            Err(e) => Err(self.terminate(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use std::time::Duration;

    use log::Level;

    use super::*;
    use crate::driver::SessionBuilder;
    use crate::error::TransportError;
    use crate::host::{MemoryResults, RETURN_MESSAGE_KEY, ScriptStatus};
    use crate::transport::mock::{self, MockTransport, PROMPT};

    fn session(transport: MockTransport) -> (CliSession<MockTransport>, Arc<Mutex<MemoryResults>>) {
        let results = Arc::new(Mutex::new(MemoryResults::new()));
        let session = SessionBuilder::new(transport)
            .results(results.clone())
            .build()
            .unwrap();
        (session, results)
    }

    #[tokio::test]
    async fn test_send_command_records_display_form() {
        let (mut session, _) = session(MockTransport::new());

        assert!(session.send_command("delete x.cfg // y").await.unwrap());

        assert_eq!(session.transport().commands(), vec!["delete x.cfg\ny"]);
        assert_eq!(session.history().entries(), ["delete x.cfg"]);
    }

    #[tokio::test]
    async fn test_cli_error_is_fatal_by_default() {
        let transport = MockTransport::new().respond("vlan create 5000", "% Invalid VLAN id");
        let (mut session, results) = session(transport);

        let err = session.send_command("vlan create 5000").await.unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::CommandFailed { .. })));
        assert!(session.history().is_empty());

        let results = results.lock().unwrap();
        assert_eq!(results.status, Some(ScriptStatus::Failure));
        assert!(results.values[RETURN_MESSAGE_KEY].contains("% Invalid VLAN id"));
    }

    #[tokio::test]
    async fn test_cli_error_recoverable() {
        let transport = MockTransport::new().respond("show isis", "Error: ISIS not configured");
        let (mut session, results) = session(transport);

        let options = SendOptions::recoverable().with_msg_on_error("no ISIS yet");
        assert!(!session.send_command_with("show isis", &options).await.unwrap());
        assert_eq!(session.last_error(), Some("Error: ISIS not configured"));
        assert!(results.lock().unwrap().status.is_none());

        assert!(session.send_command("show clock").await.unwrap());
        assert_eq!(session.last_error(), None);
        assert_eq!(session.history().entries(), ["show clock"]);
    }

    #[tokio::test]
    async fn test_ignored_error_message_is_logged() {
        mock::capture_logs();
        let transport = MockTransport::new().respond("show mstp", "Error: MSTP disabled");
        let (mut session, _) = session(transport);

        let options = SendOptions::recoverable().with_msg_on_error("spanning tree off");
        assert!(!session.send_command_with("show mstp", &options).await.unwrap());
        assert!(!session.send_command_with("show mstp", &SendOptions::recoverable()).await.unwrap());

        let ignored: Vec<_> = mock::captured_logs()
            .into_iter()
            .filter(|(_, message)| message.starts_with("Ignoring above error"))
            .collect();
        assert_eq!(
            ignored,
            vec![(Level::Error, "Ignoring above error: spanning tree off".to_string())]
        );
    }

    #[tokio::test]
    async fn test_last_output_keeps_accepted_command() {
        let transport = MockTransport::new()
            .respond("show vlan basic", "VLAN 1 default\nVLAN 10 users")
            .respond("show isis", "Error: ISIS not configured");
        let (mut session, _) = session(transport);
        assert!(session.last_output().is_none());

        assert!(session.send_command("show vlan basic").await.unwrap());
        assert!(!session
            .send_command_with("show isis", &SendOptions::recoverable())
            .await
            .unwrap());

        let record = session.last_output().unwrap();
        assert_eq!(record.command, "show vlan basic");
        assert!(record.raw.ends_with(PROMPT));
        assert!(record.has_output());
        assert_eq!(record.lines().collect::<Vec<_>>(), ["VLAN 1 default", "VLAN 10 users"]);
        assert!(record.elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_disconnect_is_fatal() {
        let transport = MockTransport::new().disconnect("show clock");
        let (mut session, results) = session(transport);

        let err = session.send_command("show clock").await.unwrap_err();

        assert!(matches!(err, Error::Transport(TransportError::Disconnected)));
        let results = results.lock().unwrap();
        assert_eq!(results.status, Some(ScriptStatus::Failure));
        assert!(results.values[RETURN_MESSAGE_KEY].contains("disconnected"));
    }

    #[tokio::test]
    async fn test_timeout_is_fatal_in_chain() {
        let transport = MockTransport::new().time_out("save config", Duration::from_secs(30));
        let (mut session, results) = session(transport);

        let err = session
            .send_command_chain("vlan create 10 type port-mstprstp 0; save config; end")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Transport error: Operation timed out after 30s"
        );
        assert_eq!(
            session.transport().commands(),
            vec!["vlan create 10 type port-mstprstp 0", "save config"]
        );
        assert_eq!(results.lock().unwrap().status, Some(ScriptStatus::Failure));
    }

    #[tokio::test]
    async fn test_error_after_fourth_line_is_ignored() {
        let transport = MockTransport::new().respond(
            "show log",
            "line 1\nline 2\nline 3\nline 4\nERROR: fan failed",
        );
        let (mut session, _) = session(transport);
        assert!(session.send_command("show log").await.unwrap());
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let transport = MockTransport::new().fail("show", "session closed");
        let (mut session, results) = session(transport);

        let options = SendOptions::recoverable();
        let err = session.send_command_with("show vlan", &options).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(results.lock().unwrap().status, Some(ScriptStatus::Failure));
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let (mut session, _) = session(MockTransport::new());
        session.config.dry_run = true;

        assert!(session.send_command_chain("vlan create 10; reload // y").await.unwrap());
        assert!(session.transport().sent.is_empty());
        assert_eq!(session.history().entries(), ["vlan create 10", "reload"]);
    }

    #[tokio::test]
    async fn test_chain_waits_only_on_last_command() {
        let (mut session, _) = session(MockTransport::new());

        let options = SendOptions::default().with_wait_for_prompt(false);
        assert!(session.send_command_chain_with("enable;config term;reset // y", &options).await.unwrap());

        assert_eq!(
            session.transport().sent,
            vec![
                ("enable".to_string(), true),
                ("config term".to_string(), true),
                ("reset\ny".to_string(), false),
            ]
        );
    }

    #[tokio::test]
    async fn test_chain_continue_directive() {
        let transport = MockTransport::new().respond("b", "% Invalid input detected");
        let (mut session, _) = session(transport);

        let ok = session.send_command_chain("a;#error continue;b;c").await.unwrap();

        assert!(!ok);
        assert_eq!(session.transport().commands(), vec!["a", "b", "c"]);
        assert_eq!(session.history().entries(), ["a", "c"]);
    }

    #[tokio::test]
    async fn test_chain_stop_directive_aborts() {
        let transport = MockTransport::new().respond("b", "% Invalid input detected");
        let (mut session, results) = session(transport);

        let ok = session.send_command_chain("#error stop;a;b;c").await.unwrap();

        assert!(!ok);
        assert_eq!(session.transport().commands(), vec!["a", "b"]);
        assert!(results.lock().unwrap().status.is_none());
    }

    #[tokio::test]
    async fn test_chain_fail_directive_restores_fatal_errors() {
        let transport = MockTransport::new().respond("b", "% Invalid input detected");
        let (mut session, _) = session(transport);

        let options = SendOptions::recoverable();
        let err = session
            .send_command_chain_with("#error fail;a;b;c", &options)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Device(_)));
        assert_eq!(session.transport().commands(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_chain_last_command_failure() {
        let transport = MockTransport::new().respond("c", "% Invalid input detected");
        let (mut session, _) = session(transport);

        let options = SendOptions::recoverable();
        assert!(!session.send_command_chain_with("a;c", &options).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_chain_sends_nothing() {
        let (mut session, _) = session(MockTransport::new());
        assert!(session.send_command_chain(" ; \n").await.unwrap());
        assert!(session.transport().sent.is_empty());
    }

    #[tokio::test]
    async fn test_send_command_show() {
        let transport = MockTransport::new()
            .respond("show sys-info", "Sysname : core-1\nUpTime : 10 days")
            .respond("show ipv6", "% Invalid input");
        let (mut session, _) = session(transport);

        let output = session.send_command_show("show sys-info").await.unwrap();
        assert_eq!(output.as_deref(), Some("Sysname : core-1\nUpTime : 10 days"));

        let output = session
            .send_command_show_with("show ipv6", &SendOptions::recoverable())
            .await
            .unwrap();
        assert_eq!(output, None);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_regex_query_bool() {
        let transport =
            MockTransport::new().respond("show boot config flags", "flags tftpd true\nflags ssh true");
        let (mut session, _) = session(transport);

        let value = session
            .send_command_regex("bool://show boot config flags||^flags tftpd true")
            .await
            .unwrap();
        assert_eq!(value, Value::Bool(true));
    }

    #[tokio::test]
    async fn test_regex_query_tries_alternatives() {
        let transport = MockTransport::new()
            .respond("show isis system-id", "% Invalid input detected")
            .respond("show isis", "System Id : 0200.0000.0001");
        let (mut session, results) = session(transport);

        let value = session
            .send_command_regex("str://show isis system-id & show isis||System Id : (\\S+)")
            .await
            .unwrap();

        assert_eq!(value, Value::Str("0200.0000.0001".to_string()));
        assert_eq!(session.transport().commands(), vec!["show isis system-id", "show isis"]);
        assert!(results.lock().unwrap().status.is_none());
    }

    #[tokio::test]
    async fn test_regex_query_stops_at_first_output() {
        let transport = MockTransport::new().respond("show vlan", "10 users\n20 voice");
        let (mut session, _) = session(transport);

        let value = session
            .send_command_regex("dict://show vlan & show vlan basic||^(\\d+) (\\w+)")
            .await
            .unwrap();

        assert_eq!(session.transport().commands(), vec!["show vlan"]);
        let dict = value.as_dict().unwrap();
        assert_eq!(dict["10"], "users");
        assert_eq!(dict["20"], "voice");
    }

    #[tokio::test]
    async fn test_regex_query_without_output() {
        let (mut session, _) = session(MockTransport::new());

        let value = session
            .send_command_regex("int://show vlan count||(\\d+)")
            .await
            .unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_regex_query_without_mode() {
        let transport = MockTransport::new().respond("show ports", "1/1 up\n1/2 down");
        let (mut session, _) = session(transport);

        let value = session
            .send_command_regex("show ports||^(\\S+) up")
            .await
            .unwrap();
        assert_eq!(value, Value::List(vec!["1/1".into()]));
    }

    #[tokio::test]
    async fn test_regex_query_invalid_mode_is_fatal() {
        let transport = MockTransport::new().respond("show vlan", "10 users");
        let (mut session, results) = session(transport);

        let err = session
            .send_command_regex("float://show vlan||(\\d+)")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Format(FormatError::InvalidMode { .. })));
        assert!(session.transport().sent.is_empty());
        assert_eq!(results.lock().unwrap().status, Some(ScriptStatus::Failure));
    }

    #[tokio::test]
    async fn test_regex_query_malformed() {
        let (mut session, _) = session(MockTransport::new());
        let err = session.send_command_regex("show vlan").await.unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::MalformedQuery { .. })));
    }
}
