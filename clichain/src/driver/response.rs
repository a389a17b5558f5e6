//! Output record of one command.

use std::time::Duration;

use crate::channel::clean_output;

/// Output of one command sent to the device.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    /// The command as sent on the wire.
    pub command: String,

    /// Raw transport output, including echo and prompt.
    pub raw: String,

    /// Output with the command echo and trailing prompt removed.
    pub cleaned: String,

    /// Time taken by the transport.
    pub elapsed: Duration,
}

impl OutputRecord {
    /// Record raw output, cleaning it.
    pub fn new(command: impl Into<String>, raw: impl Into<String>, elapsed: Duration) -> Self {
        let raw = raw.into();
        let cleaned = clean_output(&raw);
        Self {
            command: command.into(),
            raw,
            cleaned,
            elapsed,
        }
    }

    /// Whether the device printed anything besides echo and prompt.
    pub fn has_output(&self) -> bool {
        !self.cleaned.is_empty()
    }

    /// Get the cleaned output lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.cleaned.lines()
    }
}

impl std::fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_cleans_output() {
        let record = OutputRecord::new(
            "show vlan basic",
            "show vlan basic\r\nVLAN 1 default\r\nVLAN 10 users\r\nswitch:1#",
            Duration::from_millis(5),
        );
        assert_eq!(record.cleaned, "VLAN 1 default\nVLAN 10 users");
        assert_eq!(record.lines().count(), 2);
        assert!(record.has_output());
    }

    #[test]
    fn test_echo_only_has_no_output() {
        let record = OutputRecord::new("end", "end\nswitch:1#", Duration::ZERO);
        assert!(!record.has_output());
        assert_eq!(record.to_string(), "");
    }
}
