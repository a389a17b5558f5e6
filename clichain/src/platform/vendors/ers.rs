//! ERS Series family definition.
//!
//! Three levels of configuration context. The ERS file-transfer client is
//! always available, so warp batches need no capability check and no
//! service toggling: a single `configure network` command fetches and
//! applies the file.

use crate::platform::{DeviceFamily, FamilyDefinition, TransferTemplates};

/// Create the ERS Series family definition.
pub fn platform() -> Result<FamilyDefinition, regex::Error> {
    Ok(FamilyDefinition::new(DeviceFamily::ErsSeries)
        .with_context_pattern(
            r#"^(?:interface |router \w+$|route-map (?:"[\w\d\s\.\+-]+"|[\w\d\.-]+) \d+$|ip igmp profile \d+$|wireless|application|ipv6 dhcp guard policy |ipv6 nd raguard policy )"#,
        )?
        .with_context_pattern(
            r"^(?:security|crypto|ap-profile |captive-portal |network-profile |radio-profile )",
        )?
        .with_context_pattern(r"^(?:locale)")?
        .with_transfer(TransferTemplates::new(
            r#"configure network address {server} filename "{file}""#,
        )))
}
