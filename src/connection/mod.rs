//! Connection Module
//!
//! Transport and framing engine for a single DMCC link.
//!
//! ## Architecture
//! - One transport (TCP by default), exclusively owned
//! - One command in flight at a time
//! - Read loop driven by the framing state machine in [`crate::protocol`]
//! - Running statistics for the whole test run

mod client;
mod stats;
mod transport;

pub use client::{Connection, READ_CHUNK_SIZE};
pub use stats::{Stats, StatsSnapshot};
pub use transport::{connect_tcp, is_no_data, Transport};
