//! Device family table.

use std::fmt;
use std::str::FromStr;

use super::definition::FamilyDefinition;
use super::vendors;
use crate::error::PlatformError;

/// Supported device families.
///
/// Parsed from the exact family name the host reports; an unknown name is
/// an error, never a fallback to some default family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    FabricEngine,
    SummitSeries,
    ErsSeries,
    IswSeries,
    IswSeriesMarvell,
}

impl DeviceFamily {
    /// All supported families.
    pub const ALL: [DeviceFamily; 5] = [
        DeviceFamily::FabricEngine,
        DeviceFamily::SummitSeries,
        DeviceFamily::ErsSeries,
        DeviceFamily::IswSeries,
        DeviceFamily::IswSeriesMarvell,
    ];

    /// Family name as reported by the host.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceFamily::FabricEngine => "Fabric Engine",
            DeviceFamily::SummitSeries => "Summit Series",
            DeviceFamily::ErsSeries => "ERS Series",
            DeviceFamily::IswSeries => "ISW-Series",
            DeviceFamily::IswSeriesMarvell => "ISW-Series-Marvell",
        }
    }

    /// Build the definition of this family.
    pub fn definition(&self) -> Result<FamilyDefinition, PlatformError> {
        let definition = match self {
            DeviceFamily::FabricEngine => vendors::fabric_engine::platform(),
            DeviceFamily::SummitSeries => vendors::summit::platform(),
            DeviceFamily::ErsSeries => vendors::ers::platform(),
            DeviceFamily::IswSeries => vendors::isw::platform(*self),
            DeviceFamily::IswSeriesMarvell => vendors::isw::platform(*self),
        };
        definition.map_err(|e| PlatformError::InvalidDefinition {
            message: format!("{}: {e}", self.name()),
        })
    }
}

impl FromStr for DeviceFamily {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceFamily::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| PlatformError::UnknownFamily {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
