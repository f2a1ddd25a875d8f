//! RGB565 framebuffer as dumped by the device.

use super::Expansion;
use crate::{Error, Result, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Total pixel count for the device screen.
pub const PIXEL_COUNT: usize = SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize;

/// Decoded RGB565 framebuffer.
#[derive(Clone)]
pub struct Framebuffer {
    /// Pixel data in RGB565 format, row-major.
    data: Vec<u16>,
    /// Width of the framebuffer.
    width: u16,
    /// Height of the framebuffer.
    height: u16,
}

impl Framebuffer {
    /// Parses a dump taken from the 480x272 device screen.
    pub fn from_device_dump(raw: &[u8]) -> Result<Self> {
        Self::from_le_bytes(raw, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    /// Parses `width * height` little-endian RGB565 samples.
    ///
    /// Fails with [`Error::TruncatedData`] when `raw` is too short. Bytes past
    /// the last sample are ignored.
    pub fn from_le_bytes(raw: &[u8], width: u16, height: u16) -> Result<Self> {
        let expected = frame_len(width, height);
        if raw.len() < expected {
            return Err(Error::TruncatedData {
                expected,
                actual: raw.len(),
            });
        }

        let data = raw[..expected]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the width of the framebuffer.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Returns the height of the framebuffer.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns a reference to the raw pixel data.
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Gets a pixel at the given coordinates.
    pub fn get_pixel(&self, x: u16, y: u16) -> Option<u16> {
        if x < self.width && y < self.height {
            let idx = y as usize * self.width as usize + x as usize;
            Some(self.data[idx])
        } else {
            None
        }
    }

    /// Converts the framebuffer to packed RGB8 bytes, R then G then B.
    pub fn to_rgb888(&self, expansion: Expansion) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.data.len() * 3);
        for &pixel in &self.data {
            let (r, g, b) = expansion.expand(pixel);
            rgb.push(r);
            rgb.push(g);
            rgb.push(b);
        }
        rgb
    }
}

/// Number of raw bytes a `width` x `height` RGB565 frame occupies.
pub fn frame_len(width: u16, height: u16) -> usize {
    width as usize * height as usize * 2
}

/// Decodes a little-endian RGB565 dump into RGB888 bytes.
///
/// Output is `3 * width * height` bytes in input pixel order, expanded with
/// [`Expansion::Shift`].
pub fn decode(raw: &[u8], width: u16, height: u16) -> Result<Vec<u8>> {
    let framebuffer = Framebuffer::from_le_bytes(raw, width, height)?;
    Ok(framebuffer.to_rgb888(Expansion::Shift))
}

/// Converts RGB565 to RGB888 by shifting each channel into the high bits.
///
/// Green gets the same 3-bit shift as red and blue, so its top bit falls off
/// and full green reads as 0xF8. Images already captured from the device were
/// converted this way and new captures must match them.
#[inline]
pub fn rgb565_to_rgb888_shift(pixel: u16) -> (u8, u8, u8) {
    let r = (pixel >> 11) & 0x1F;
    let g = (pixel >> 5) & 0x3F;
    let b = pixel & 0x1F;
    ((r << 3) as u8, (g << 3) as u8, (b << 3) as u8)
}

/// Converts RGB565 to RGB888 with bit replication.
#[inline]
pub fn rgb565_to_rgb888(pixel: u16) -> (u8, u8, u8) {
    let r = ((pixel >> 11) & 0x1F) as u8;
    let g = ((pixel >> 5) & 0x3F) as u8;
    let b = (pixel & 0x1F) as u8;
    // Expand to 8-bit
    let r8 = (r << 3) | (r >> 2);
    let g8 = (g << 2) | (g >> 4);
    let b8 = (b << 3) | (b >> 2);
    (r8, g8, b8)
}
