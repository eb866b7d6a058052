//! Command discovery
//!
//! Asks the device for its command list via the help listing.

use crate::connection::{Connection, Transport};
use crate::error::{DmccError, Result};
use crate::protocol::{escape_excerpt, FAILURE_EXCERPT_LEN};

/// Introspection command that lists every supported command
pub const DISCOVERY_COMMAND: &str = "help";

/// Lines of prose before the first command entry
pub const HELP_HEADER_LINES: usize = 2;

/// Separator between a command name and its description
pub const HELP_SEPARATOR: &str = " - ";

/// Marks settings that have both a getter and a setter
pub const GET_SET_MARKER: &str = "GET/SET";

/// Commands the device claims to support
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandListing {
    /// Plain commands
    pub regular: Vec<String>,

    /// Getter forms of GET/SET settings (`GET/SET X` listed as `GET X`)
    pub get_set: Vec<String>,
}

impl CommandListing {
    pub fn len(&self) -> usize {
        self.regular.len() + self.get_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_empty() && self.get_set.is_empty()
    }
}

/// Fetch and parse the device's help listing
pub fn discover_commands<T: Transport>(connection: &mut Connection<T>) -> Result<CommandListing> {
    let wire = format!("{}{}", connection.command_prefix(), DISCOVERY_COMMAND);
    let timeout = connection.timeout();

    let response = connection
        .send_and_receive(wire.as_bytes(), None)?
        .ok_or_else(|| DmccError::FramingTimeout {
            command: DISCOVERY_COMMAND.to_string(),
            timeout,
        })?;

    if !response.is_success() {
        return Err(DmccError::DeviceFailure {
            command: DISCOVERY_COMMAND.to_string(),
            result: response.result_str(),
            payload: escape_excerpt(&response.payload, FAILURE_EXCERPT_LEN),
        });
    }

    let listing = parse_help_listing(&response.payload)?;
    tracing::debug!(
        "Discovered {} regular and {} GET/SET commands",
        listing.regular.len(),
        listing.get_set.len()
    );
    Ok(listing)
}

/// Parse a help listing payload
///
/// The first [`HELP_HEADER_LINES`] lines are skipped. Every other non-blank
/// line must be `<name> - <description>`.
pub fn parse_help_listing(payload: &[u8]) -> Result<CommandListing> {
    let text = String::from_utf8_lossy(payload);
    let mut listing = CommandListing::default();

    for line in text.lines().skip(HELP_HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }

        let (name, _description) = line.split_once(HELP_SEPARATOR).ok_or_else(|| {
            DmccError::Discovery(format!("malformed help line: {:?}", line))
        })?;
        let name = name.trim();

        if name.contains(GET_SET_MARKER) {
            listing.get_set.push(name.replace(GET_SET_MARKER, "GET"));
        } else {
            listing.regular.push(name.to_string());
        }
    }

    Ok(listing)
}
