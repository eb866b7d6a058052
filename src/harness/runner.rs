//! Test run
//!
//! Runs a [`TestPlan`] against a device: discover, exercise, reconcile.

use std::time::Instant;

use super::registry::TestNameRegistry;
use super::reporter::Reporter;
use crate::catalogue::TestPlan;
use crate::connection::{Connection, StatsSnapshot, Transport};
use crate::driver::{discover_commands, test_command, CommandSpec, Coverage};
use crate::error::Result;

/// Outcome of a single test case
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub name: String,
    pub spec: CommandSpec,
    pub passed: bool,
    /// Failure description, `None` on pass
    pub error: Option<String>,
    pub duration_ms: f64,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcomes: Vec<TestOutcome>,
    pub coverage: Coverage,
    pub stats: StatsSnapshot,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }
}

/// Drives one test run over a connection
pub struct Runner<'a, T: Transport, R: Reporter> {
    connection: &'a mut Connection<T>,
    reporter: R,
    names: TestNameRegistry,
}

impl<'a, T: Transport, R: Reporter> Runner<'a, T, R> {
    pub fn new(connection: &'a mut Connection<T>, reporter: R) -> Self {
        Self {
            connection,
            reporter,
            names: TestNameRegistry::new(),
        }
    }

    /// Run every command in `plan`
    ///
    /// Discovery must succeed; after that a failing command is recorded and
    /// the run moves on. Only reporter I/O errors end the run early.
    pub fn run(&mut self, plan: &TestPlan) -> Result<RunSummary> {
        let listing = discover_commands(self.connection)?;

        let mut outcomes = Vec::with_capacity(plan.commands.len());
        for spec in &plan.commands {
            outcomes.push(self.run_one(spec)?);
        }

        let coverage = Coverage::reconcile(
            listing,
            outcomes.iter().map(|o| o.spec.command.as_str()),
            plan.whitelist.iter().map(String::as_str),
        );
        coverage.log_warnings();

        Ok(RunSummary {
            outcomes,
            coverage,
            stats: self.connection.stats().snapshot(),
        })
    }

    /// Run a single command as its own test case
    pub fn run_one(&mut self, spec: &CommandSpec) -> Result<TestOutcome> {
        let name = self.names.register(spec);
        self.reporter.start(&name)?;
        tracing::debug!("{:?}", spec);

        let started = Instant::now();
        let result = test_command(self.connection, spec);
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let error = match result {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("{} failed: {}", name, e);
                Some(e.to_string())
            }
        };
        let passed = error.is_none();

        self.reporter.stop(&name)?;
        self.reporter.result(&name, passed, Some(duration_ms))?;

        Ok(TestOutcome {
            name,
            spec: spec.clone(),
            passed,
            error,
            duration_ms,
        })
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }
}
