//! DMCC connection
//!
//! Sends one command at a time and reads its response.

use std::net::TcpStream;
use std::time::{Duration, Instant};

use bytes::BytesMut;

use super::stats::{Stats, StatsSnapshot};
use super::transport::{connect_tcp, is_no_data, Transport};
use crate::config::Config;
use crate::error::{DmccError, Result};
use crate::protocol::{encode_command, Frame, FrameAssembler, FrameState, Response};

/// Bytes requested from the transport per read
pub const READ_CHUNK_SIZE: usize = 512;

/// A connection to a device running diags
///
/// Strictly half-duplex: the caller sends a command, then receives its
/// response, before sending the next one.
#[derive(Debug)]
pub struct Connection<T: Transport = TcpStream> {
    /// Link to the device
    transport: T,

    /// Peer address for logging
    peer_addr: String,

    /// Default response timeout
    timeout: Duration,

    /// Header prepended by the command driver
    command_prefix: String,

    /// Bytes received for the command in flight
    pending: BytesMut,

    /// Last command sent, for logging and statistics
    last_command: String,

    /// When the last command went out
    sent_at: Option<Instant>,

    stats: Stats,
}

impl Connection<TcpStream> {
    /// Connect to the device described by `config`
    pub fn connect(config: &Config) -> Result<Self> {
        let stats = Stats::new();
        tracing::debug!(
            "[{:>6}ms] Initializing DMCC connection to {}",
            stats.clock_ms(),
            config.addr()
        );

        let stream = connect_tcp(config)?;
        let mut connection = Self::with_transport(stream, config);
        connection.stats = stats;
        Ok(connection)
    }
}

impl<T: Transport> Connection<T> {
    /// Wrap an already open transport
    pub fn with_transport(transport: T, config: &Config) -> Self {
        let peer_addr = transport.peer();
        Self {
            transport,
            peer_addr,
            timeout: config.timeout,
            command_prefix: config.command_prefix.clone(),
            pending: BytesMut::with_capacity(READ_CHUNK_SIZE),
            last_command: String::new(),
            sent_at: None,
            stats: Stats::new(),
        }
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Default response timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Reset counters, timers and the failure log; the link stays open
    pub fn reset(&mut self) {
        self.stats.reset();
    }

    /// Log the end-of-run summary and return the final numbers
    pub fn final_report(&self) -> StatsSnapshot {
        self.stats.log_summary();
        self.stats.snapshot()
    }

    /// Send one command line
    ///
    /// CR LF is appended. Anything left in the pending buffer from an earlier
    /// exchange is discarded.
    pub fn send(&mut self, command: &[u8]) -> Result<()> {
        self.pending.clear();
        self.last_command = String::from_utf8_lossy(command).into_owned();
        self.sent_at = Some(Instant::now());

        tracing::debug!(
            "[{:>6}ms] sending {:?}",
            self.stats.clock_ms(),
            self.last_command
        );

        let message = encode_command(command);
        self.transport.send(&message).map_err(|e| {
            let reason = format!("write to {} failed: {}", self.peer_addr, e);
            self.stats
                .record_transport_failure(&self.last_command, Duration::ZERO, &reason);
            DmccError::Transport(reason)
        })
    }

    /// Read the response to the last command
    ///
    /// Returns `Ok(None)` when no result marker could be parsed before
    /// `timeout`; the failure is already counted. Link failures are errors,
    /// except the device closing the link once the result marker is in,
    /// which ends the response like the quiet period would.
    pub fn receive(&mut self, timeout: Duration) -> Result<Option<Response>> {
        let started_at = Instant::now();
        let sent_at = self.sent_at.unwrap_or(started_at);
        let buffer = std::mem::take(&mut self.pending);
        let mut frame = FrameAssembler::with_buffer(buffer, started_at, timeout);
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        while let Some(wait) = frame.wait_budget(Instant::now()) {
            if wait.is_zero() {
                frame.advance(Instant::now());
                continue;
            }

            match self.transport.recv_timeout(&mut chunk, wait) {
                Ok(0) if frame.state() == FrameState::DrainingQuietPeriod => {
                    // Marker already seen; the close ends the payload
                    tracing::debug!(
                        "[{:>6}ms] {} closed after responding",
                        self.stats.clock_ms(),
                        self.peer_addr
                    );
                    break;
                }
                Ok(0) => {
                    let reason = format!("connection closed by {}", self.peer_addr);
                    return Err(self.abort(&frame, started_at, sent_at, reason));
                }
                Ok(n) => {
                    frame.push(&chunk[..n], Instant::now());
                }
                Err(e) if is_no_data(&e) => {
                    frame.advance(Instant::now());
                }
                Err(e) => {
                    let reason = format!("read from {} failed: {}", self.peer_addr, e);
                    return Err(self.abort(&frame, started_at, sent_at, reason));
                }
            }
        }

        let last_data_at = frame.last_data_at().unwrap_or(started_at);
        let elapsed = last_data_at.saturating_duration_since(sent_at);

        match frame.finish() {
            Frame::Parsed(response) => {
                self.stats
                    .record_response(&self.last_command, &response, elapsed);
                Ok(Some(response))
            }
            Frame::Unparsed(buffered) => {
                tracing::debug!(
                    "[{:>6}ms] No result within {:?}",
                    self.stats.clock_ms(),
                    timeout
                );
                self.stats
                    .record_no_parse(&self.last_command, &buffered, elapsed);
                Ok(None)
            }
        }
    }

    /// Send `command` and wait for its response
    ///
    /// Uses the connection's default timeout unless `timeout` is given.
    pub fn send_and_receive(
        &mut self,
        command: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Option<Response>> {
        self.send(command)?;
        self.receive(timeout.unwrap_or(self.timeout))
    }

    /// Shut the link down
    pub fn close(mut self) -> Result<()> {
        tracing::debug!("Closing DMCC connection to {}", self.peer_addr);
        self.transport.shutdown()?;
        Ok(())
    }

    fn abort(
        &mut self,
        frame: &FrameAssembler,
        started_at: Instant,
        sent_at: Instant,
        reason: String,
    ) -> DmccError {
        let elapsed = frame
            .last_data_at()
            .unwrap_or(started_at)
            .saturating_duration_since(sent_at);
        self.stats
            .record_transport_failure(&self.last_command, elapsed, &reason);
        DmccError::Transport(reason)
    }
}
