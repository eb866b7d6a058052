//! Protocol Module
//!
//! Framing for the DMCC line protocol.
//!
//! ## Request Format
//! ```text
//! ┌──────────────────────────────┬──────────┐
//! │ prefix + command [+ " " args]│  CR LF   │
//! └──────────────────────────────┴──────────┘
//! ```
//!
//! ## Response Format
//! ```text
//! ┌────────────┬──────────────┬──────────┬───────────────────────────┐
//! │ preamble   │ "[" code "]" │ [CR] LF  │ payload (any bytes, any   │
//! │ (optional) │  code = \d+  │          │ length, may be empty)     │
//! └────────────┴──────────────┴──────────┴───────────────────────────┘
//! ```
//!
//! There is no length prefix and no terminator. A response is considered
//! complete once the result marker has shown up near the start of the buffer
//! and the link has then been quiet for [`QUIET_PERIOD`].
//!
//! ### Result Codes
//! - `0`: success
//! - anything else: device-reported failure

mod response;
mod framing;
mod assembler;

pub use response::{escape_excerpt, Response, FAILURE_EXCERPT_LEN};
pub use framing::{has_marker, parse_response, MARKER_PATTERN, MARKER_WINDOW, QUIET_PERIOD};
pub use assembler::{Frame, FrameAssembler, FrameState};

/// Line terminator appended to every command
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Build the bytes put on the wire for a command
pub fn encode_command(command: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(command.len() + LINE_TERMINATOR.len());
    message.extend_from_slice(command);
    message.extend_from_slice(LINE_TERMINATOR);
    message
}
