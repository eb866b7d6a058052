//! Harness Module
//!
//! Turns driver calls into named, reported test cases.

mod registry;
mod reporter;
mod runner;

pub use registry::TestNameRegistry;
pub use reporter::{lava_available, ConsoleReporter, LavaReporter, Reporter, LAVA_TEST_CASE_BIN};
pub use runner::{RunSummary, Runner, TestOutcome};
