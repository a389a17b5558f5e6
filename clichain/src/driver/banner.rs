//! Script header banner.

use std::fmt;

use log::info;

use super::session::CliSession;
use crate::transport::CliTransport;

/// Banner width in columns.
pub const BANNER_WIDTH: usize = 80;

const MISSING: &str = "n/a";

/// Framed header printed at the start of a script run.
///
/// ```text
/// ================================================================================
/// == Workflow Onboard Switch, task Configure VLANs                              ==
/// == Script version: 1.2 | Library version: 0.1.0                               ==
/// ================================================================================
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBanner {
    pub script: Option<String>,
    pub activity: Option<String>,
    pub author: Option<String>,
    pub script_version: String,
    /// Device family line, shown only when set.
    pub family: Option<String>,
}

impl ScriptBanner {
    pub fn new(script_version: impl Into<String>) -> Self {
        Self {
            script: None,
            activity: None,
            author: None,
            script_version: script_version.into(),
            family: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Render the banner lines.
    pub fn lines(&self) -> Vec<String> {
        let rule = "=".repeat(BANNER_WIDTH);
        let mut lines = vec![
            rule.clone(),
            framed(&format!(
                "Workflow {}, task {}",
                self.script.as_deref().unwrap_or(MISSING),
                self.activity.as_deref().unwrap_or(MISSING)
            )),
        ];
        if let Some(author) = &self.author {
            lines.push(framed(&format!("Author: {author}")));
        }
        lines.push(framed(&format!(
            "Script version: {} | Library version: {}",
            self.script_version,
            env!("CARGO_PKG_VERSION")
        )));
        if let Some(family) = &self.family {
            lines.push(rule.clone());
            lines.push(framed(&format!("Device family : {family}")));
        }
        lines.push(rule);
        lines
    }
}

impl fmt::Display for ScriptBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

fn framed(text: &str) -> String {
    let padding = BANNER_WIDTH.saturating_sub(text.chars().count() + 6);
    format!("== {}{} ==", text, " ".repeat(padding))
}

impl<T: CliTransport> CliSession<T> {
    /// Log the script header.
    ///
    /// With `full_info` the banner also names the device family.
    pub fn print_header(
        &self,
        script_version: &str,
        author: Option<&str>,
        full_info: bool,
    ) -> ScriptBanner {
        let banner = ScriptBanner {
            script: self.config().script_name.clone(),
            activity: self.config().activity_name.clone(),
            author: author.map(str::to_string),
            script_version: script_version.to_string(),
            family: full_info.then(|| {
                self.family()
                    .map_or(MISSING.to_string(), |family| family.family.to_string())
            }),
        };
        for line in banner.lines() {
            info!("{}", line);
        }
        banner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::SessionBuilder;
    use crate::platform::DeviceFamily;
    use crate::transport::SessionConfig;
    use crate::transport::mock::MockTransport;

    #[test]
    fn test_lines_are_framed_to_width() {
        let banner = ScriptBanner {
            script: Some("Onboard Switch".to_string()),
            activity: Some("Configure VLANs".to_string()),
            ..ScriptBanner::new("1.2")
        }
        .with_author("NetOps");

        let lines = banner.lines();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.len() == BANNER_WIDTH));
        assert!(lines[1].starts_with("== Workflow Onboard Switch, task Configure VLANs "));
        assert!(lines[2].starts_with("== Author: NetOps "));
        assert!(lines[3].contains(concat!("Library version: ", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn test_long_text_is_not_truncated() {
        let line = framed(&"x".repeat(90));
        assert_eq!(line, format!("== {} ==", "x".repeat(90)));
    }

    #[test]
    fn test_session_header_with_family() {
        let config = SessionConfig {
            script_name: Some("vlan_provision".to_string()),
            ..SessionConfig::default()
        };
        let session = SessionBuilder::new(MockTransport::new())
            .config(config)
            .family(DeviceFamily::ErsSeries)
            .build()
            .unwrap();

        let banner = session.print_header("1.0", None, true);
        let lines = banner.lines();

        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("== Workflow vlan_provision, task n/a "));
        assert!(lines[4].starts_with("== Device family : ERS Series "));
    }
}
