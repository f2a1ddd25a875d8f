//! Framebuffer grab library
//!
//! Requests a raw RGB565 framebuffer dump from a remote display device over
//! TCP and converts it to RGB888 for image encoders.

pub mod error;
pub mod pixel;
pub mod transport;

pub use error::{Error, Result};
pub use pixel::{decode, Expansion, Framebuffer};
pub use transport::{capture, Capture, ConnectionParams, StreamEnd};

/// Device screen dimensions
pub const SCREEN_WIDTH: u16 = 480;
pub const SCREEN_HEIGHT: u16 = 272;

/// Size of one full RGB565 frame on the wire.
pub const FRAME_BYTES: usize = SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize * 2;
