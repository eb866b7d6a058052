//! Command definitions
//!
//! A command under test and the check that runs it.

use std::time::Duration;

use regex::bytes::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::connection::{Connection, Transport};
use crate::error::{DmccError, Result};
use crate::protocol::{escape_excerpt, Response, FAILURE_EXCERPT_LEN};

/// One command to exercise, with its expectations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Command name, e.g. `ECHO` or `GET BUZZER.FREQ`
    pub command: String,

    /// Argument string appended after a space
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,

    /// Pattern the payload must match at its start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Response timeout for this command only
    #[serde(default, with = "secs", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: None,
            regex: None,
            timeout: None,
        }
    }

    pub fn args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Command plus arguments, as typed on the device console
    pub fn command_line(&self) -> String {
        match &self.args {
            Some(args) => format!("{} {}", self.command, args),
            None => self.command.clone(),
        }
    }
}

/// True for getter command names, which are tracked in their own list
pub fn is_getter(command: &str) -> bool {
    command.starts_with("GET")
}

/// Compile a payload pattern
///
/// The pattern is anchored at the start of the payload but not at its end.
/// Matching is byte-oriented: `\d` is ASCII, `.` is any byte but `\n`.
pub fn compile_payload_pattern(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(&format!(r"\A(?:{})", pattern))
        .unicode(false)
        .build()?)
}

/// Run one command and check its response
///
/// Fails with `FramingTimeout` if nothing parseable came back,
/// `DeviceFailure` for a non-zero result and `ResponseMismatch` if the
/// payload does not match `spec.regex`. The connection's default timeout is
/// left as it was, whatever happens.
pub fn test_command<T: Transport>(
    connection: &mut Connection<T>,
    spec: &CommandSpec,
) -> Result<Response> {
    let pattern = spec
        .regex
        .as_deref()
        .map(compile_payload_pattern)
        .transpose()?;

    let wire = format!("{}{}", connection.command_prefix(), spec.command_line());

    let default_timeout = connection.timeout();
    if let Some(timeout) = spec.timeout {
        connection.set_timeout(timeout);
    }
    let effective_timeout = connection.timeout();
    let outcome = connection.send_and_receive(wire.as_bytes(), None);
    connection.set_timeout(default_timeout);

    let response = outcome?.ok_or_else(|| DmccError::FramingTimeout {
        command: spec.command.clone(),
        timeout: effective_timeout,
    })?;

    if !response.is_success() {
        return Err(DmccError::DeviceFailure {
            command: spec.command.clone(),
            result: response.result_str(),
            payload: escape_excerpt(&response.payload, FAILURE_EXCERPT_LEN),
        });
    }

    if let (Some(re), Some(source)) = (pattern, spec.regex.as_ref()) {
        if !re.is_match(&response.payload) {
            return Err(DmccError::ResponseMismatch {
                command: spec.command.clone(),
                pattern: source.clone(),
                payload: escape_excerpt(&response.payload, FAILURE_EXCERPT_LEN),
            });
        }
    }

    Ok(response)
}

/// Timeouts in catalogue files are fractional seconds
mod secs {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(d)?
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(D::Error::custom))
            .transpose()
    }
}
