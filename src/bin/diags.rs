//! DMCC Diags Test Binary
//!
//! Runs a test plan against a device and reports coverage.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dmcc::catalogue::TestPlan;
use dmcc::harness::{lava_available, ConsoleReporter, LavaReporter, Reporter, RunSummary, Runner};
use dmcc::{Config, Connection, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// DMCC diags command test
#[derive(Parser, Debug)]
#[command(name = "dmcc-diags")]
#[command(about = "Exercise the diags command set over DMCC")]
#[command(version)]
struct Args {
    /// Device host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Device DMCC port
    #[arg(short, long, default_value = "10026")]
    port: u16,

    /// Default response timeout in seconds
    #[arg(short, long, default_value = "5")]
    timeout: f64,

    /// JSON test plan (built-in plan if omitted)
    #[arg(short, long)]
    catalogue: Option<PathBuf>,

    /// Emit LAVA signals even if lava-test-case is not on PATH
    #[arg(long)]
    lava: bool,

    /// Command header sent before every command
    #[arg(long, default_value = dmcc::config::DEFAULT_COMMAND_PREFIX)]
    prefix: String,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dmcc=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(summary) if summary.all_passed() => {}
        Ok(summary) => {
            tracing::error!("{} of {} commands failed", summary.failed(), summary.outcomes.len());
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Test run aborted: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<RunSummary> {
    let timeout = Duration::try_from_secs_f64(args.timeout)
        .map_err(|e| dmcc::DmccError::Config(format!("invalid timeout {}: {}", args.timeout, e)))?;

    let plan = match &args.catalogue {
        Some(path) => TestPlan::load(path)?,
        None => TestPlan::default(),
    };

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .timeout(timeout)
        .command_prefix(&args.prefix)
        .build();

    tracing::info!("dmcc-diags v{}", dmcc::VERSION);
    tracing::info!("DMCC connection to {}", config.addr());
    let mut connection = Connection::connect(&config)?;

    let summary = if args.lava || lava_available() {
        println!("LAVA Test, using lava signal");
        run_with(&mut connection, &plan, LavaReporter::new(io::stdout()))?
    } else {
        println!("Console Test, no use of lava-signals");
        run_with(&mut connection, &plan, ConsoleReporter)?
    };

    connection.final_report();
    connection.close()?;
    Ok(summary)
}

fn run_with<R: Reporter>(
    connection: &mut Connection,
    plan: &TestPlan,
    reporter: R,
) -> Result<RunSummary> {
    Runner::new(connection, reporter).run(plan)
}
