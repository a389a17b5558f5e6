//! Fabric Engine family definition.
//!
//! Two levels of configuration context: interfaces, routers, VRFs,
//! I-SIDs and similar objects at depth 0, route-map entries inside a
//! router context at depth 1.
//!
//! # Context Examples
//!
//! ```text
//! interface gigabitEthernet 1/1      # enters depth 1
//!    default-vlan-id 10
//!    exit                            # back to depth 0
//! router isis                        # enters depth 1
//!    route-map "redist" 10           # enters depth 2
//!       exit
//!    exit
//! ```
//!
//! Warp batches go through the device's built-in TFTP daemon, toggled by a
//! boot flag, and run with `source`.

use crate::platform::{DeviceFamily, FamilyDefinition, TransferTemplates};

/// Create the Fabric Engine family definition.
pub fn platform() -> Result<FamilyDefinition, regex::Error> {
    let transfer = TransferTemplates::new(
        r#"copy "{server}:{file}" /intflash/.script.src -y; source .script.src debug"#,
    )
    .with_check_query("bool://show boot config flags||^flags tftpd true")
    .with_service("boot config flags tftpd", "no boot config flags tftpd")
    .with_bootstrap("enable")
    .with_bootstrap("config term");

    Ok(FamilyDefinition::new(DeviceFamily::FabricEngine)
        .with_context_pattern(
            r#"^ *(?:interface |router \w+$|router vrf|route-map (?:"[\w\d\s\.\+-]+"|[\w\d\.-]+) \d+$|application|i-sid \d+|wireless|logical-intf isis \d+|mgmt (?:\d|clip|vlan|oob)|ovsdb$)"#,
        )?
        .with_context_pattern(r#"^ *(?:route-map (?:"[\w\d\s\.\+-]+"|[\w\d\.-]+) \d+$)"#)?
        .with_transfer(transfer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::TransferCheck;

    #[test]
    fn test_depth_zero_contexts() {
        let definition = platform().unwrap();
        let level0 = &definition.context_patterns[0];

        assert!(level0.is_match("interface gigabitEthernet 1/1"));
        assert!(level0.is_match("router isis"));
        assert!(level0.is_match("router vrf red"));
        assert!(level0.is_match("i-sid 20010"));
        assert!(level0.is_match("mgmt clip"));
        assert!(level0.is_match("logical-intf isis 1"));
        assert!(level0.is_match("  interface vlan 10"));

        assert!(!level0.is_match("vlan create 10 type port-mstprstp 0"));
        assert!(!level0.is_match("router isis enable"));
        assert!(!level0.is_match("no shutdown"));
    }

    #[test]
    fn test_route_map_context() {
        let definition = platform().unwrap();
        let level1 = &definition.context_patterns[1];

        assert!(level1.is_match(r#"route-map "redist static" 10"#));
        assert!(level1.is_match("route-map permit-all 5"));
        assert!(!level1.is_match("route-map permit-all"));
    }

    #[test]
    fn test_transfer_templates() {
        let definition = platform().unwrap();
        let transfer = definition.transfer_templates().unwrap();

        assert_eq!(
            transfer.check,
            TransferCheck::Query("bool://show boot config flags||^flags tftpd true".to_string())
        );
        assert_eq!(transfer.activate.as_deref(), Some("boot config flags tftpd"));
        assert_eq!(transfer.deactivate.as_deref(), Some("no boot config flags tftpd"));
        assert_eq!(transfer.bootstrap, vec!["enable", "config term"]);
        assert_eq!(
            transfer.execute_command("10.0.0.5", "ops.deploy.10_1_1_1"),
            r#"copy "10.0.0.5:ops.deploy.10_1_1_1" /intflash/.script.src -y; source .script.src debug"#
        );
    }
}
