//! Transport module.
//!
//! Sends the capture request to the device and drains the framebuffer dump
//! it streams back over TCP.

mod params;
mod protocol;
mod reader;

pub use params::{ConnectionParams, DEFAULT_CONNECT_TIMEOUT, DEFAULT_IDLE_TIMEOUT};
pub use protocol::{DEFAULT_CHUNK_SIZE, DEFAULT_HOST, DEFAULT_PORT, REQUEST_TOKEN};
pub use reader::{capture, drain, Capture, StreamEnd};
