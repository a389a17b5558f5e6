//! Command execution against one device.
//!
//! The driver layer provides the main API: sending commands and command
//! chains, extracting values with regex queries, summarizing what was done
//! and delivering batched configuration through the warp buffer.

mod banner;
mod builder;
pub mod chain;
mod history;
mod options;
pub(crate) mod response;
mod session;
mod warp;

pub use banner::{BANNER_WIDTH, ScriptBanner};
pub use builder::SessionBuilder;
pub use chain::{Directive, display_form, parse_chain, wire_form};
pub use history::{CommandHistory, INDENT_WIDTH, Summary};
pub use options::SendOptions;
pub use response::OutputRecord;
pub use session::CliSession;
pub use warp::{StagedFile, WarpBuffer};
