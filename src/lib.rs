//! # dmcc
//!
//! Test client for the DMCC line protocol spoken by diagnostics firmware:
//! - Plaintext commands over one persistent TCP connection
//! - `[<code>]` result marker followed by a free-form payload
//! - Completion detected by a quiet period, no length prefix
//! - Pass/fail checks, coverage against the device's own command list
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runner (harness)                           │
//! │         test names, LAVA / console reporting                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Command Driver                             │
//! │      test_command / discover_commands / coverage             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ send_and_receive
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Connection                                │
//! │            transport + statistics                            │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │ FrameAssembler  │                │    Transport    │
//!   │ (state machine) │                │   (TcpStream)   │
//!   └─────────────────┘                └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod connection;
pub mod driver;
pub mod catalogue;
pub mod harness;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DmccError, Result};
pub use config::Config;
pub use connection::Connection;
pub use protocol::Response;
pub use driver::{discover_commands, test_command, CommandSpec};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the dmcc crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
