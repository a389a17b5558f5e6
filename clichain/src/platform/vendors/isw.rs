//! ISW-Series family definitions (both chipsets share one CLI).
//!
//! ISW switches only contribute context patterns for history summaries;
//! they have no warp buffer transfer support.

use crate::platform::{DeviceFamily, FamilyDefinition};

/// Create an ISW-Series family definition.
pub fn platform(family: DeviceFamily) -> Result<FamilyDefinition, regex::Error> {
    FamilyDefinition::new(family).with_context_pattern(r"^ *(?:ringv2-group |interface )")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isw_platform() {
        let definition = platform(DeviceFamily::IswSeriesMarvell).unwrap();
        assert_eq!(definition.family, DeviceFamily::IswSeriesMarvell);
        assert!(definition.context_patterns[0].is_match("interface GigabitEthernet 1/1"));
        assert!(definition.context_patterns[0].is_match("ringv2-group 1"));
        assert!(definition.transfer.is_none());
    }
}
