//! Summit Series family definition.
//!
//! No configuration contexts: every command is top-level, so history
//! summaries are flat. Warp batches are fetched with `tftp get` and run as
//! a script once the `tftpd` process is started.

use crate::platform::{DeviceFamily, FamilyDefinition, TransferTemplates};

/// Create the Summit Series family definition.
pub fn platform() -> Result<FamilyDefinition, regex::Error> {
    let transfer = TransferTemplates::new(
        r#"tftp get {server} "{file}" .script.xsf; run script .script.xsf"#,
    )
    .with_check_query("bool://show process tftpd||Ready")
    .with_service("start process tftpd", "terminate process tftpd graceful");

    Ok(FamilyDefinition::new(DeviceFamily::SummitSeries).with_transfer(transfer))
}
