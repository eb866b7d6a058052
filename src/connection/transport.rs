//! Transport abstraction
//!
//! The connection only needs three things from the link: send a whole
//! buffer, read with a deadline, and shut down. `TcpStream` is the
//! production implementation; tests can plug in scripted links.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{DmccError, Result};

/// Smallest read timeout handed to the OS (zero means "block forever")
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// A byte link to the device
pub trait Transport {
    /// Write all of `data`
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read whatever is available, waiting at most `timeout`
    ///
    /// Returns `Ok(0)` only when the peer closed the link. An expired
    /// deadline surfaces as `WouldBlock` or `TimedOut`.
    fn recv_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize>;

    /// Close both directions
    fn shutdown(&mut self) -> io::Result<()>;

    /// Peer description for logging
    fn peer(&self) -> String {
        "unknown".to_string()
    }
}

impl Transport for TcpStream {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_all(data)?;
        self.flush()
    }

    fn recv_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        self.set_read_timeout(Some(timeout.max(MIN_READ_TIMEOUT)))?;
        self.read(buf)
    }

    fn shutdown(&mut self) -> io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    fn peer(&self) -> String {
        self.peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

/// Errors that only mean "nothing arrived before the deadline"
pub fn is_no_data(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// Open the TCP link described by `config`
///
/// Tries every resolved address in turn with the configured connect timeout.
pub fn connect_tcp(config: &Config) -> Result<TcpStream> {
    let addr = config.addr();
    let candidates = addr
        .to_socket_addrs()
        .map_err(|e| DmccError::Config(format!("cannot resolve {}: {}", addr, e)))?;

    let mut last_err = None;
    for candidate in candidates {
        match TcpStream::connect_timeout(&candidate, config.connect_timeout) {
            Ok(stream) => {
                // Commands are single short lines; don't let Nagle hold them back
                stream.set_nodelay(true)?;
                if !config.write_timeout.is_zero() {
                    stream.set_write_timeout(Some(config.write_timeout))?;
                }
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", candidate, e);
                last_err = Some(e);
            }
        }
    }

    Err(DmccError::Transport(match last_err {
        Some(e) => format!("cannot connect to {}: {}", addr, e),
        None => format!("{} resolved to no addresses", addr),
    }))
}
