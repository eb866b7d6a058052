//! Run statistics
//!
//! Success/failure counters, slowest-command tracking and the failure log
//! that is printed at the end of a run.

use std::time::{Duration, Instant};

use crate::protocol::{escape_excerpt, Response, FAILURE_EXCERPT_LEN};

/// Cumulative statistics for one connection
#[derive(Debug, Clone)]
pub struct Stats {
    /// Reference point for log timestamps
    started_at: Instant,

    success_count: u64,
    failure_count: u64,

    /// Command with the longest elapsed time among parsed responses
    slowest_command: Option<String>,
    slowest_time: Duration,

    /// One formatted entry per failure, oldest first
    failures: Vec<String>,
}

/// Point-in-time copy of [`Stats`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub success_count: u64,
    pub failure_count: u64,
    pub slowest_command: Option<String>,
    pub slowest_time: Duration,
    pub failures: Vec<String>,
    pub elapsed: Duration,
}

impl StatsSnapshot {
    /// All failure entries, one per line
    pub fn failure_log(&self) -> String {
        self.failures.join("\n")
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            success_count: 0,
            failure_count: 0,
            slowest_command: None,
            slowest_time: Duration::ZERO,
            failures: Vec::new(),
        }
    }

    /// Zero everything and restart the run clock
    pub fn reset(&mut self) {
        *self = Self::new();
        tracing::debug!("[{:>6}ms] DMCC stats reset", self.clock_ms());
    }

    /// Milliseconds since creation or the last reset
    pub fn clock_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn slowest_command(&self) -> Option<&str> {
        self.slowest_command.as_deref()
    }

    pub fn slowest_time(&self) -> Duration {
        self.slowest_time
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// All failure entries, one per line
    pub fn failure_log(&self) -> String {
        self.failures.join("\n")
    }

    /// Account for a parsed response
    pub fn record_response(&mut self, command: &str, response: &Response, elapsed: Duration) {
        if elapsed > self.slowest_time {
            self.slowest_time = elapsed;
            self.slowest_command = Some(command.to_string());
        }

        let excerpt = escape_excerpt(&response.payload, FAILURE_EXCERPT_LEN);
        if response.is_success() {
            self.success_count += 1;
            tracing::debug!(
                "[{:>6}ms] {} succeeded with result {} in {:.1}ms, retval[0:{}]: {}",
                self.clock_ms(),
                command,
                response.result_str(),
                as_ms(elapsed),
                FAILURE_EXCERPT_LEN,
                excerpt
            );
        } else {
            self.push_failure(format!(
                "{} failed with result {} in {:.1}ms, retval[0:{}]: {}",
                command,
                response.result_str(),
                as_ms(elapsed),
                FAILURE_EXCERPT_LEN,
                excerpt
            ));
        }
    }

    /// Account for a response that never produced a marker
    pub fn record_no_parse(&mut self, command: &str, buffered: &[u8], elapsed: Duration) {
        self.push_failure(format!(
            "{} failed after {:.1}ms, buffer[0:{}]: {}",
            command,
            as_ms(elapsed),
            FAILURE_EXCERPT_LEN,
            escape_excerpt(buffered, FAILURE_EXCERPT_LEN)
        ));
    }

    /// Account for a link failure in the middle of a command
    pub fn record_transport_failure(&mut self, command: &str, elapsed: Duration, reason: &str) {
        self.push_failure(format!(
            "{} aborted after {:.1}ms: {}",
            command,
            as_ms(elapsed),
            reason
        ));
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            success_count: self.success_count,
            failure_count: self.failure_count,
            slowest_command: self.slowest_command.clone(),
            slowest_time: self.slowest_time,
            failures: self.failures.clone(),
            elapsed: self.started_at.elapsed(),
        }
    }

    /// Log the end-of-run summary
    pub fn log_summary(&self) {
        let ts = self.clock_ms();
        tracing::info!("[{:>6}ms] {}", ts, "-".repeat(80));
        tracing::info!(
            "[{:>6}ms] Finished with {} succeeded and {} failed commands",
            ts,
            self.success_count,
            self.failure_count
        );
        if !self.failures.is_empty() {
            tracing::info!("[{:>6}ms] Error Buf:\n{}", ts, self.failure_log());
        }
        tracing::info!(
            "[{:>6}ms] Slowest command {} took {:.1}ms",
            ts,
            self.slowest_command.as_deref().unwrap_or("<none>"),
            as_ms(self.slowest_time)
        );
    }

    fn push_failure(&mut self, entry: String) {
        self.failure_count += 1;
        tracing::warn!("[{:>6}ms] {}", self.clock_ms(), entry);
        self.failures.push(entry);
    }
}

fn as_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
