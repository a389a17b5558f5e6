//! Built-in device family definitions.

pub mod ers;
pub mod fabric_engine;
pub mod isw;
pub mod summit;
