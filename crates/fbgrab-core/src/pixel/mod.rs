//! Pixel decoding module.
//!
//! Turns a little-endian RGB565 framebuffer dump into RGB888 bytes.

mod expansion;

pub mod framebuffer;

pub use expansion::Expansion;
pub use framebuffer::{decode, rgb565_to_rgb888, rgb565_to_rgb888_shift, Framebuffer};
