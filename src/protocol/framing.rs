//! Result marker detection and response parsing

use std::sync::OnceLock;
use std::time::Duration;

use bytes::Bytes;
use regex::bytes::Regex;

use super::Response;

/// `[<digits>]`, optional CR, LF, then the rest of the buffer as payload.
///
/// Byte-oriented (`-u`) so binary payloads match, and `s` so the payload
/// group runs across embedded newlines.
pub const MARKER_PATTERN: &str = r"(?s-u)\[([0-9]+)\]\r?\n(.*)";

/// Only this many leading bytes are checked while a response streams in
pub const MARKER_WINDOW: usize = 15;

/// Link silence after the marker that ends a response
pub const QUIET_PERIOD: Duration = Duration::from_millis(100);

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(MARKER_PATTERN).expect("marker pattern is valid"))
}

/// Check whether a result marker sits within the first [`MARKER_WINDOW`] bytes
pub fn has_marker(buf: &[u8]) -> bool {
    let window = &buf[..buf.len().min(MARKER_WINDOW)];
    marker().is_match(window)
}

/// Parse a complete response out of the whole buffer
///
/// Returns `None` if no marker is present anywhere. Bytes before the marker
/// end up in [`Response::preamble`], not in the payload.
pub fn parse_response(buf: Bytes) -> Option<Response> {
    let caps = marker().captures(&buf)?;
    let whole = caps.get(0)?;
    let code = caps.get(1)?;
    let payload = caps.get(2)?;

    Some(Response {
        preamble: buf.slice(..whole.start()),
        result_code: buf.slice(code.range()),
        payload: buf.slice(payload.range()),
    })
}
