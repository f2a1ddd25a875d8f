//! Error types for framebuffer capture and decoding.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing or decoding a frame.
#[derive(Error, Debug)]
pub enum Error {
    /// The TCP connection could not be established.
    #[error("Failed to connect to {addr}: {source}")]
    ConnectionFailure {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The TCP connection did not complete in time.
    #[error("Timed out connecting to {addr} after {timeout:?}")]
    ConnectTimeout { addr: String, timeout: Duration },

    /// Sending the request token failed.
    #[error("Failed to send request: {0}")]
    Request(#[source] std::io::Error),

    /// The read loop stopped before a full frame arrived.
    #[error("Transfer interrupted after {received} of {expected} bytes: {reason}")]
    TransferFault {
        received: usize,
        expected: usize,
        reason: String,
    },

    /// Raw buffer is shorter than the frame it should hold.
    #[error("Truncated frame data: expected {expected} bytes, got {actual}")]
    TruncatedData { expected: usize, actual: usize },

    /// Unknown channel expansion name.
    #[error("Invalid channel expansion: {0}")]
    InvalidExpansion(String),

    /// Connection parameters cannot be used.
    #[error("Invalid connection parameters: {0}")]
    InvalidParams(String),
}
