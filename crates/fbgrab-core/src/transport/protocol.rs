//! Capture protocol definitions.
//!
//! Protocol structure:
//! - Client sends the ASCII token `getscreen`, no length prefix or terminator
//! - Device replies with one raw little-endian RGB565 frame
//! - Device closes the connection once the frame is sent
//!
//! There is no framing, acknowledgment or error code on the wire.

/// Request token that triggers a framebuffer dump.
pub const REQUEST_TOKEN: &[u8] = b"getscreen";

/// Default device address.
pub const DEFAULT_HOST: &str = "192.168.10.70";

/// TCP port the device's screen server listens on.
pub const DEFAULT_PORT: u16 = 2007;

/// Read chunk size, one Ethernet MTU.
pub const DEFAULT_CHUNK_SIZE: usize = 1500;
