//! Connection parameters for a capture.

use std::time::Duration;

use super::protocol::{DEFAULT_CHUNK_SIZE, DEFAULT_HOST, DEFAULT_PORT, REQUEST_TOKEN};
use crate::{Error, Result};

/// Default bound on establishing the TCP connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on waiting for the next chunk.
/// The device lingers about 2s after the last byte before closing.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Where and how to request a framebuffer dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Device hostname or IP address.
    pub host: String,
    /// Device TCP port.
    pub port: u16,
    /// Bytes sent once after connecting.
    pub token: Vec<u8>,
    /// Set `SO_REUSEADDR` on the socket before connecting.
    pub reuse_address: bool,
    /// Bound on connecting (and on resolving the host).
    pub connect_timeout: Duration,
    /// Bound on each read and on sending the token. `None` waits forever.
    pub idle_timeout: Option<Duration>,
    /// Size of each socket read.
    pub chunk_size: usize,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            token: REQUEST_TOKEN.to_vec(),
            reuse_address: true,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            idle_timeout: Some(DEFAULT_IDLE_TIMEOUT),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ConnectionParams {
    /// Creates parameters for a specific endpoint with default settings.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Returns the endpoint as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Checks that the parameters describe a usable capture.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::InvalidParams("host is empty".to_string()));
        }
        if self.token.is_empty() {
            return Err(Error::InvalidParams("request token is empty".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidParams("chunk size must be non-zero".to_string()));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::InvalidParams("connect timeout must be non-zero".to_string()));
        }
        if self.idle_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::InvalidParams("idle timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}
