//! Configuration for the DMCC client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

/// Header the diagnostics firmware expects in front of every command
pub const DEFAULT_COMMAND_PREFIX: &str = "||;1>";

/// Main configuration for a DMCC connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Device host name or IP address
    pub host: String,

    /// Device DMCC port
    pub port: u16,

    /// Timeout for establishing the TCP connection
    pub connect_timeout: Duration,

    /// Socket write timeout
    pub write_timeout: Duration,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Default time to wait for a result marker
    pub timeout: Duration,

    /// Prepended to every command issued by the driver
    pub command_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 10026,
            connect_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(5),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` as accepted by `ToSocketAddrs`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the device host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the device port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the socket write timeout
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = timeout;
        self
    }

    /// Set the default response timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the command header; pass an empty string to send commands bare
    pub fn command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.command_prefix = prefix.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
