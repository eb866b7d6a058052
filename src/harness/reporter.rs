//! Result reporting
//!
//! LAVA picks test cases out of the console through `<LAVA_SIGNAL_*>` lines;
//! outside LAVA results only go to the log.

use std::env;
use std::io::{self, Write};

/// Executable LAVA puts on `PATH` inside a test job
pub const LAVA_TEST_CASE_BIN: &str = "lava-test-case";

/// Receives test case lifecycle events
pub trait Reporter {
    fn start(&mut self, name: &str) -> io::Result<()>;

    fn stop(&mut self, name: &str) -> io::Result<()>;

    /// `measurement` is the command's wall-clock time in milliseconds
    fn result(&mut self, name: &str, passed: bool, measurement: Option<f64>) -> io::Result<()>;
}

/// Emits LAVA signal lines to a writer (stdout in a real job)
pub struct LavaReporter<W: Write> {
    out: W,
}

impl<W: Write> LavaReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for LavaReporter<W> {
    fn start(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "<LAVA_SIGNAL_STARTTC {}>", name)?;
        self.out.flush()
    }

    fn stop(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "<LAVA_SIGNAL_ENDTC {}>", name)?;
        self.out.flush()
    }

    fn result(&mut self, name: &str, passed: bool, measurement: Option<f64>) -> io::Result<()> {
        let result = if passed { "pass" } else { "fail" };
        let measurement = measurement
            .map(|m| format!("MEASUREMENT={:.3}", m))
            .unwrap_or_default();
        writeln!(
            self.out,
            "<LAVA_SIGNAL_TESTCASE TEST_CASE_ID={} RESULT={} {}>",
            name, result, measurement
        )?;
        self.out.flush()
    }
}

/// Logs results through `tracing`
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn start(&mut self, name: &str) -> io::Result<()> {
        tracing::debug!("Starting {}", name);
        Ok(())
    }

    fn stop(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    fn result(&mut self, name: &str, passed: bool, measurement: Option<f64>) -> io::Result<()> {
        let ms = measurement.map(|m| format!(" ({:.1}ms)", m)).unwrap_or_default();
        if passed {
            tracing::info!("{} passed{}", name, ms);
        } else {
            tracing::warn!("{} FAILED{}", name, ms);
        }
        Ok(())
    }
}

/// True when running inside a LAVA job
pub fn lava_available() -> bool {
    env::var_os("PATH")
        .map(|paths| {
            env::split_paths(&paths).any(|dir| dir.join(LAVA_TEST_CASE_BIN).is_file())
        })
        .unwrap_or(false)
}
