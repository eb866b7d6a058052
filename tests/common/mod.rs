//! Shared test fixtures
//!
//! - [`MockDevice`]: a TCP listener on localhost that replays scripted
//!   responses, optionally split into delayed chunks
//! - [`ScriptedTransport`]: an in-memory [`Transport`] for link failures
//!   that are awkward to provoke over a real socket

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::rc::Rc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use dmcc::connection::Transport;
use dmcc::{Config, Connection};

// =============================================================================
// Mock Device
// =============================================================================

/// What the device does after reading one command line
#[derive(Debug, Clone)]
pub enum Step {
    /// Write each chunk after sleeping for its delay
    Reply(Vec<(Duration, Vec<u8>)>),

    /// Read the command, answer nothing
    Silence,

    /// Read the command, then drop the connection
    Close,

    /// Write the whole reply, then drop the connection after the delay
    ReplyThenClose(Duration, Vec<u8>),
}

impl Step {
    /// Whole reply in one write
    pub fn reply(bytes: &[u8]) -> Self {
        Step::Reply(vec![(Duration::ZERO, bytes.to_vec())])
    }

    /// Reply split into chunks with the same gap before each chunk but the first
    pub fn fragmented(chunks: &[&[u8]], gap: Duration) -> Self {
        Step::Reply(
            chunks
                .iter()
                .enumerate()
                .map(|(i, c)| (if i == 0 { Duration::ZERO } else { gap }, c.to_vec()))
                .collect(),
        )
    }
}

/// Scripted DMCC device on 127.0.0.1
pub struct MockDevice {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl MockDevice {
    /// Listen on a free port and serve one client with `script`
    ///
    /// After the script the device keeps the link open until the client
    /// closes it, so the last response can finish its quiet period.
    pub fn start(script: Vec<Step>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();

            for step in script {
                match read_command_line(&mut stream) {
                    Some(line) => received.push(line),
                    None => return received,
                }

                match step {
                    Step::Reply(chunks) => {
                        for (delay, bytes) in chunks {
                            thread::sleep(delay);
                            if stream.write_all(&bytes).is_err() {
                                return received;
                            }
                            let _ = stream.flush();
                        }
                    }
                    Step::Silence => {}
                    Step::Close => return received,
                    Step::ReplyThenClose(delay, bytes) => {
                        let _ = stream.write_all(&bytes);
                        let _ = stream.flush();
                        thread::sleep(delay);
                        return received;
                    }
                }
            }

            let mut sink = [0u8; 256];
            while let Ok(n) = stream.read(&mut sink) {
                if n == 0 {
                    break;
                }
            }
            received
        });

        Self { addr, handle }
    }

    pub fn config(&self) -> Config {
        Config::builder()
            .host(self.addr.ip().to_string())
            .port(self.addr.port())
            .timeout(Duration::from_secs(2))
            .build()
    }

    pub fn connect(&self) -> Connection {
        Connection::connect(&self.config()).unwrap()
    }

    /// Wait for the device thread and return every command line it read
    /// (CR LF stripped)
    ///
    /// Close or drop the client connection first.
    pub fn finish(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_command_line(stream: &mut TcpStream) -> Option<String> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    while !line.ends_with(b"\r\n") {
        match stream.read(&mut byte) {
            Ok(0) | Err(_) => return None,
            Ok(_) => line.push(byte[0]),
        }
    }
    line.truncate(line.len() - 2);
    Some(String::from_utf8_lossy(&line).into_owned())
}

// =============================================================================
// Scripted Transport
// =============================================================================

/// One answer to a `recv_timeout` call
#[derive(Debug)]
pub enum Event {
    Data(Vec<u8>),
    Error(io::ErrorKind),
    Eof,
    /// Nothing arrives for the whole read timeout
    Quiet,
}

/// In-memory transport; once the script is exhausted every read waits out
/// its timeout and reports `WouldBlock`
pub struct ScriptedTransport {
    events: VecDeque<Event>,
    sent: Rc<RefCell<Vec<u8>>>,
    fail_writes: bool,
    closed: Rc<RefCell<bool>>,
}

/// Handles for inspecting a [`ScriptedTransport`] after it moved into a
/// connection
#[derive(Clone)]
pub struct TransportProbe {
    pub sent: Rc<RefCell<Vec<u8>>>,
    pub closed: Rc<RefCell<bool>>,
}

impl ScriptedTransport {
    pub fn new(events: Vec<Event>) -> (Self, TransportProbe) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let closed = Rc::new(RefCell::new(false));
        let transport = Self {
            events: events.into(),
            sent: Rc::clone(&sent),
            fail_writes: false,
            closed: Rc::clone(&closed),
        };
        (transport, TransportProbe { sent, closed })
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }
        self.sent.borrow_mut().extend_from_slice(data);
        Ok(())
    }

    fn recv_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        match self.events.pop_front() {
            Some(Event::Data(bytes)) => {
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
            Some(Event::Error(kind)) => Err(io::Error::new(kind, "scripted")),
            Some(Event::Eof) => Ok(0),
            Some(Event::Quiet) | None => {
                thread::sleep(timeout);
                Err(io::Error::new(io::ErrorKind::WouldBlock, "no data"))
            }
        }
    }

    fn shutdown(&mut self) -> io::Result<()> {
        *self.closed.borrow_mut() = true;
        Ok(())
    }

    fn peer(&self) -> String {
        "scripted".to_string()
    }
}

/// Connection over a scripted transport with the given default timeout
pub fn scripted_connection(
    events: Vec<Event>,
    timeout: Duration,
) -> (Connection<ScriptedTransport>, TransportProbe) {
    let (transport, probe) = ScriptedTransport::new(events);
    let config = Config::builder().timeout(timeout).build();
    (Connection::with_transport(transport, &config), probe)
}
