//! Command history and the nested execution summary.

use std::fmt;

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use super::session::CliSession;
use crate::platform::{CONTEXT_EXIT_PATTERN, FamilyDefinition};
use crate::transport::CliTransport;

/// Spaces per nesting depth in a summary.
pub const INDENT_WIDTH: usize = 3;

/// Marker of a command entering a configuration context.
pub const ENTRY_MARKER: &str = "-> ";

/// Marker of every other command.
pub const CONTINUATION_MARKER: &str = "          |-> ";

/// Line reported when nothing was executed.
pub const EMPTY_SUMMARY: &str = "No command was performed";

/// First line of a non-empty summary.
pub const SUMMARY_HEADER: &str = "The following command was successfully performed on switch :";

static CONTEXT_EXIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(CONTEXT_EXIT_PATTERN).expect("context exit pattern compiles"));

/// Display forms of the commands executed successfully, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistory {
    entries: Vec<String>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: impl Into<String>) {
        self.entries.push(command.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Render the history as a tree following configuration contexts.
    ///
    /// A command matching the entry pattern of the current depth is marked
    /// with [`ENTRY_MARKER`] and opens the next depth. A context exit goes
    /// back one depth and is printed like any other command. Without a
    /// family definition every command is printed flat.
    pub fn summarize(&self, family: Option<&FamilyDefinition>) -> Summary {
        if self.entries.is_empty() {
            return Summary {
                lines: vec![EMPTY_SUMMARY.to_string()],
            };
        }

        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        lines.push(SUMMARY_HEADER.to_string());

        let patterns = family.map_or(&[][..], |family| family.context_patterns.as_slice());
        let mut depth = 0;
        let mut indent = String::new();

        for command in &self.entries {
            if family.is_some() {
                if depth < patterns.len() && patterns[depth].is_match(command) {
                    lines.push(format!("{ENTRY_MARKER}{indent}{command}"));
                    depth += 1;
                    indent = " ".repeat(INDENT_WIDTH * depth);
                    continue;
                } else if CONTEXT_EXIT.is_match(command) {
                    depth = depth.saturating_sub(1);
                    indent = " ".repeat(INDENT_WIDTH * depth);
                }
            }
            lines.push(format!("{CONTINUATION_MARKER}{indent}{command}"));
        }

        Summary { lines }
    }
}

/// Rendered execution summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub lines: Vec<String>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

impl<T: CliTransport> CliSession<T> {
    /// Log the execution summary and clear the history.
    pub fn print_summary(&mut self) -> Summary {
        let summary = self.history.summarize(self.family());
        for line in &summary.lines {
            info!("{}", line);
        }
        self.history.clear();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::DeviceFamily;

    fn history(commands: &[&str]) -> CommandHistory {
        let mut history = CommandHistory::new();
        for command in commands {
            history.push(*command);
        }
        history
    }

    #[test]
    fn test_empty_history() {
        let summary = CommandHistory::new().summarize(None);
        assert_eq!(summary.lines, vec!["No command was performed"]);
    }

    #[test]
    fn test_flat_without_family() {
        let summary = history(&["interface vlan 10", "exit"]).summarize(None);
        assert_eq!(
            summary.lines,
            vec![
                SUMMARY_HEADER,
                "          |-> interface vlan 10",
                "          |-> exit",
            ]
        );
    }

    #[test]
    fn test_fabric_engine_nesting() {
        let family = DeviceFamily::FabricEngine.definition().unwrap();
        let summary = history(&[
            "vlan create 10 type port-mstprstp 0",
            "interface gigabitEthernet 1/1",
            "default-vlan-id 10",
            "exit",
            "save config",
        ])
        .summarize(Some(&family));

        assert_eq!(
            summary.lines,
            vec![
                SUMMARY_HEADER,
                "          |-> vlan create 10 type port-mstprstp 0",
                "-> interface gigabitEthernet 1/1",
                "          |->    default-vlan-id 10",
                "          |-> exit",
                "          |-> save config",
            ]
        );
    }

    #[test]
    fn test_exit_never_goes_below_zero() {
        let family = DeviceFamily::FabricEngine.definition().unwrap();
        let summary = history(&["end", "router isis", "end", "end", "show clock"])
            .summarize(Some(&family));
        assert_eq!(
            summary.lines[1..],
            [
                "          |-> end",
                "-> router isis",
                "          |-> end",
                "          |-> end",
                "          |-> show clock",
            ]
        );
    }

    #[test]
    fn test_summary_display() {
        let summary = history(&["show clock"]).summarize(None);
        assert_eq!(
            summary.to_string(),
            format!("{SUMMARY_HEADER}\n          |-> show clock")
        );
    }
}
