//! Response assembly state machine
//!
//! Decides when a streamed response is complete. Time is always passed in
//! explicitly, so the transitions do not depend on the socket.
//!
//! ```text
//!                 marker in first 15 bytes
//!  AwaitingMarker ─────────────────────────► DrainingQuietPeriod
//!        │                                      │   ▲
//!        │ now >= start + timeout               │   │ new bytes restart
//!        ▼                                      │   │ the quiet clock
//!     TimedOut                                  └───┘
//!                                               │ 100 ms without bytes
//!                                               ▼
//!                                            Complete
//! ```

use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};

use super::framing::{has_marker, parse_response, QUIET_PERIOD};
use super::Response;

/// Where the read loop currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No result marker seen yet; bounded by the response timeout
    AwaitingMarker,

    /// Marker seen; waiting for the link to go quiet
    DrainingQuietPeriod,

    /// Quiet period elapsed after the marker
    Complete,

    /// Timeout elapsed without a marker in the window
    TimedOut,
}

/// Final outcome once the assembler has stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// The whole buffer contained a marker
    Parsed(Response),

    /// No marker anywhere; carries whatever was buffered
    Unparsed(Bytes),
}

/// Accumulates bytes for one response and tracks the framing state
#[derive(Debug)]
pub struct FrameAssembler {
    buffer: BytesMut,
    state: FrameState,
    deadline: Instant,
    last_data_at: Option<Instant>,
}

impl FrameAssembler {
    /// Start assembling a response at `started_at`, giving up on the marker
    /// after `timeout`
    pub fn new(started_at: Instant, timeout: Duration) -> Self {
        Self::with_buffer(BytesMut::new(), started_at, timeout)
    }

    /// Same as [`new`](Self::new) but reuses an existing allocation
    ///
    /// The buffer is cleared first.
    pub fn with_buffer(mut buffer: BytesMut, started_at: Instant, timeout: Duration) -> Self {
        buffer.clear();
        Self {
            buffer,
            state: FrameState::AwaitingMarker,
            deadline: started_at + timeout,
            last_data_at: None,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, FrameState::Complete | FrameState::TimedOut)
    }

    /// When the most recent bytes arrived
    pub fn last_data_at(&self) -> Option<Instant> {
        self.last_data_at
    }

    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Feed bytes received at `now`
    pub fn push(&mut self, data: &[u8], now: Instant) -> FrameState {
        if self.is_finished() {
            return self.state;
        }

        if !data.is_empty() {
            self.buffer.extend_from_slice(data);
            self.last_data_at = Some(now);

            if self.state == FrameState::AwaitingMarker && has_marker(&self.buffer) {
                self.state = FrameState::DrainingQuietPeriod;
            }
        }

        self.advance(now)
    }

    /// Apply time-based transitions as of `now`
    pub fn advance(&mut self, now: Instant) -> FrameState {
        match self.state {
            FrameState::AwaitingMarker if now >= self.deadline => {
                self.state = FrameState::TimedOut;
            }
            FrameState::DrainingQuietPeriod => {
                if let Some(quiet_until) = self.quiet_until() {
                    if now >= quiet_until {
                        self.state = FrameState::Complete;
                    }
                }
            }
            _ => {}
        }
        self.state
    }

    /// How long the next read may block before a transition is due
    ///
    /// `None` once finished. A zero budget means [`advance`](Self::advance)
    /// will finish or move the state machine.
    pub fn wait_budget(&self, now: Instant) -> Option<Duration> {
        match self.state {
            FrameState::AwaitingMarker => Some(self.deadline.saturating_duration_since(now)),
            FrameState::DrainingQuietPeriod => self
                .quiet_until()
                .map(|until| until.saturating_duration_since(now)),
            FrameState::Complete | FrameState::TimedOut => None,
        }
    }

    /// Run the marker against the full buffer and hand back the result
    pub fn finish(self) -> Frame {
        let buffered = self.buffer.freeze();
        match parse_response(buffered.clone()) {
            Some(response) => Frame::Parsed(response),
            None => Frame::Unparsed(buffered),
        }
    }

    fn quiet_until(&self) -> Option<Instant> {
        self.last_data_at.map(|at| at + QUIET_PERIOD)
    }
}
