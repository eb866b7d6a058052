//! Response definitions
//!
//! A parsed DMCC response.

use bytes::Bytes;

/// Number of payload bytes shown in log lines and failure entries
pub const FAILURE_EXCERPT_LEN: usize = 50;

/// Result code that signals success
const SUCCESS_CODE: &[u8] = b"0";

/// A complete response read from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Bytes that arrived before the result marker (usually empty)
    pub preamble: Bytes,

    /// Result code digits, e.g. `b"0"` or `b"102"`
    pub result_code: Bytes,

    /// Everything after the marker line
    pub payload: Bytes,
}

impl Response {
    /// True if the device reported result code `0`
    ///
    /// The comparison is on the literal digits: `00` is not a success.
    pub fn is_success(&self) -> bool {
        self.result_code.as_ref() == SUCCESS_CODE
    }

    /// Result code as text
    pub fn result_str(&self) -> String {
        String::from_utf8_lossy(&self.result_code).into_owned()
    }

    /// Result code as a number, if it fits
    pub fn code(&self) -> Option<u32> {
        std::str::from_utf8(&self.result_code).ok()?.parse().ok()
    }
}

/// Escape the first `limit` bytes of `bytes` for a single log line
pub fn escape_excerpt(bytes: &[u8], limit: usize) -> String {
    let end = bytes.len().min(limit);
    bytes[..end].escape_ascii().to_string()
}
