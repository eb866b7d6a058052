//! Error types for the DMCC client
//!
//! Provides a unified error type for all operations.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using DmccError
pub type Result<T> = std::result::Result<T, DmccError>;

/// Unified error type for DMCC operations
#[derive(Debug, Error)]
pub enum DmccError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Socket-level failure: refused, reset, closed by peer, write failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// No result marker could be parsed before the deadline
    #[error("Command {command}: no result within {timeout:?}")]
    FramingTimeout { command: String, timeout: Duration },

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    /// Well-formed response with a non-zero result code
    #[error("Command {command}: returned {result}, expected 0")]
    DeviceFailure {
        command: String,
        result: String,
        payload: String,
    },

    /// Successful result code but the payload did not satisfy the pattern
    #[error("Command {command}: {pattern:?} was not matched by {payload}")]
    ResponseMismatch {
        command: String,
        pattern: String,
        payload: String,
    },

    #[error("Invalid payload pattern: {0}")]
    Pattern(#[from] regex::Error),

    // -------------------------------------------------------------------------
    // Catalogue Errors
    // -------------------------------------------------------------------------
    #[error("Command discovery failed: {0}")]
    Discovery(String),

    #[error("Catalogue error: {0}")]
    Catalogue(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DmccError {
    /// True for failures caused by the link rather than by the device's answer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DmccError::Io(_) | DmccError::Transport(_) | DmccError::FramingTimeout { .. }
        )
    }
}

impl From<serde_json::Error> for DmccError {
    fn from(e: serde_json::Error) -> Self {
        DmccError::Catalogue(e.to_string())
    }
}
