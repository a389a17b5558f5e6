//! Simulated device example
//!
//! This example drives a session against an in-memory device that answers
//! a few show commands, then runs a command chain, a regex query and a
//! warp buffer batch staged in the system temp directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example dry_run
//! ```
//!
//! Without touching the device at all (show commands still answer):
//! ```bash
//! cargo run --example dry_run -- --dry-run --family "Summit Series"
//! ```

use std::env;
use std::path::PathBuf;

use clichain::{
    CliTransport, DeviceFamily, MemoryResults, SessionBuilder, SessionConfig, TransportError,
};

/// In-memory stand-in for the host CLI session.
struct SimulatedDevice {
    tftpd_running: bool,
}

impl CliTransport for SimulatedDevice {
    async fn send(&mut self, command: &str, _wait: bool) -> Result<String, TransportError> {
        let body = match command {
            "show boot config flags" => format!("flags sshd true\nflags tftpd {}", self.tftpd_running),
            "show process tftpd" if self.tftpd_running => "tftpd     Ready".to_string(),
            "show process tftpd" => "tftpd     Stopped".to_string(),
            "show sys-info" => "Sysname     : core-1\nSysDescr    : VSP-4900-48P".to_string(),
            "boot config flags tftpd" | "start process tftpd" => {
                self.tftpd_running = true;
                String::new()
            }
            c if c.starts_with("vlan delete") => "% VLAN does not exist".to_string(),
            _ => String::new(),
        };
        Ok(format!("{command}\n{body}\ncore-1:1#"))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("=== Clichain Simulated Device Example ===\n");

    let config = SessionConfig {
        operator_id: Some("demo.user".to_string()),
        script_name: Some("Simulated Onboarding".to_string()),
        server_address: Some("10.0.0.10".to_string()),
        device_address: Some("10.1.1.1".to_string()),
        staging_root: args.staging_root,
        dry_run: args.dry_run,
        ..SessionConfig::default()
    };

    let mut session = SessionBuilder::new(SimulatedDevice {
        tftpd_running: false,
    })
    .config(config)
    .family(args.family)
    .results(MemoryResults::new())
    .build()?;

    session.print_header("1.0", Some("clichain"), true);

    // A chain with an ignored error in the middle
    let ok = session
        .send_command_chain(
            "vlan create 10 type port-mstprstp 0\n\
             #error continue\n\
             vlan delete 999\n\
             interface gigabitEthernet 1/1; default-vlan-id 10; exit",
        )
        .await?;
    println!("Chain succeeded: {ok}");
    if let Some(error) = session.last_error() {
        println!("Last ignored error: {error}");
    }

    // Extract a value
    let sysname = session
        .send_command_regex("str://show sys-info||^Sysname\\s+: (\\S+)")
        .await?;
    println!("Sysname: {}", serde_json::to_string(&sysname)?);

    // Batch the rest through the warp buffer
    session.warp_buffer_add("vlan create 20 type port-mstprstp 0; vlan name 20 \"voice\"");
    session.warp_buffer_add("vlan create 30 type port-mstprstp 0");
    let ok = session.warp_buffer_execute(None).await?;
    println!("Warp batch succeeded: {ok}\n");

    println!("{}", session.print_summary());
    Ok(())
}

struct Args {
    family: DeviceFamily,
    staging_root: PathBuf,
    dry_run: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut family = DeviceFamily::FabricEngine;
        let mut staging_root = env::temp_dir();
        let mut dry_run = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--family" | "-f" => {
                    i += 1;
                    if i < args.len() {
                        family = args[i].parse().unwrap_or(DeviceFamily::FabricEngine);
                    }
                }
                "--staging-root" | "-s" => {
                    i += 1;
                    if i < args.len() {
                        staging_root = PathBuf::from(&args[i]);
                    }
                }
                "--dry-run" | "-n" => dry_run = true,
                "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => {}
            }
            i += 1;
        }

        Self {
            family,
            staging_root,
            dry_run,
        }
    }
}

fn print_usage() {
    println!("Usage: dry_run [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -f, --family <NAME>        Device family (default: Fabric Engine)");
    println!("  -s, --staging-root <DIR>   Warp staging directory (default: temp dir)");
    println!("  -n, --dry-run              Log commands instead of sending them");
    println!("      --help                 Show this help");
}
