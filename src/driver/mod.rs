//! Driver Module
//!
//! Issues commands through a [`Connection`](crate::connection::Connection)
//! and judges the responses.
//!
//! ## Responsibilities
//! - Build the wire command from a [`CommandSpec`]
//! - Apply per-command timeouts without disturbing the connection default
//! - Reject non-zero result codes and payloads that miss their pattern
//! - Discover the device's command listing and reconcile coverage

mod command;
mod discovery;
mod coverage;

pub use command::{compile_payload_pattern, is_getter, test_command, CommandSpec};
pub use discovery::{
    discover_commands, parse_help_listing, CommandListing, DISCOVERY_COMMAND, GET_SET_MARKER,
    HELP_HEADER_LINES,
};
pub use coverage::Coverage;
