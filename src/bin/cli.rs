//! DMCC CLI Client
//!
//! Sends a single command to a device and prints the response.

use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use dmcc::driver::{discover_commands, test_command, CommandSpec};
use dmcc::{Config, Connection, DmccError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// DMCC CLI
#[derive(Parser, Debug)]
#[command(name = "dmcc-cli")]
#[command(about = "Send one DMCC command to a diags device")]
struct Args {
    /// Device address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:10026")]
    server: String,

    /// Response timeout in seconds
    #[arg(short, long, default_value = "5")]
    timeout: f64,

    /// Pattern the payload must match at its start
    #[arg(short, long)]
    regex: Option<String>,

    /// Command header sent before the command
    #[arg(long, default_value = dmcc::config::DEFAULT_COMMAND_PREFIX)]
    prefix: String,

    /// List the device's commands instead of sending one
    #[arg(long, conflicts_with = "command")]
    list: bool,

    /// Command and arguments, e.g. `ECHO somedata`
    #[arg(trailing_var_arg = true, required_unless_present = "list")]
    command: Vec<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let (host, port) = split_server(&args.server)?;
    let timeout = Duration::try_from_secs_f64(args.timeout)
        .map_err(|e| DmccError::Config(format!("invalid timeout {}: {}", args.timeout, e)))?;

    let config = Config::builder()
        .host(host)
        .port(port)
        .timeout(timeout)
        .command_prefix(&args.prefix)
        .build();
    let mut connection = Connection::connect(&config)?;

    if args.list {
        let listing = discover_commands(&mut connection)?;
        for command in listing.regular.iter().chain(&listing.get_set) {
            println!("{}", command);
        }
        return connection.close();
    }

    let mut words = args.command.into_iter();
    let mut spec = CommandSpec::new(words.next().unwrap_or_default());
    let rest: Vec<String> = words.collect();
    if !rest.is_empty() {
        spec = spec.args(rest.join(" "));
    }
    if let Some(pattern) = args.regex {
        spec = spec.regex(pattern);
    }

    let outcome = test_command(&mut connection, &spec);
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            connection.close()?;
            return Err(e);
        }
    };

    println!("[{}]", response.result_str());
    let mut stdout = io::stdout().lock();
    stdout.write_all(&response.payload)?;
    stdout.flush()?;

    connection.close()
}

fn split_server(server: &str) -> Result<(&str, u16)> {
    let (host, port) = server
        .rsplit_once(':')
        .ok_or_else(|| DmccError::Config(format!("expected host:port, got {:?}", server)))?;
    let port = port
        .parse()
        .map_err(|_| DmccError::Config(format!("invalid port in {:?}", server)))?;
    Ok((host, port))
}
