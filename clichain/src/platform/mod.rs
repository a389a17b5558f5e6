//! Device family definitions.
//!
//! Each supported family carries the patterns that describe its
//! configuration-context nesting and, where the family supports it, the
//! command templates of the warp buffer file-transfer protocol.

mod definition;
mod registry;
pub mod vendors;

pub use definition::{
    CONTEXT_EXIT_PATTERN, FILE_SLOT, FamilyDefinition, SERVER_SLOT, TransferCheck,
    TransferTemplates,
};
pub use registry::DeviceFamily;
