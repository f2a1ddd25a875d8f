//! Channel expansion modes for RGB565 to RGB888 conversion.

use crate::{Error, Result};
use std::str::FromStr;

use super::framebuffer::{rgb565_to_rgb888, rgb565_to_rgb888_shift};

/// How 5/6-bit channels are widened to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expansion {
    /// Plain left shift by 3 on every channel, low bits zero.
    /// Matches images produced by earlier capture tools.
    #[default]
    Shift,
    /// Bit replication into the low bits, full 0-255 range.
    Replicate,
}

impl Expansion {
    /// Expands a single RGB565 sample.
    #[inline]
    pub fn expand(&self, pixel: u16) -> (u8, u8, u8) {
        match self {
            Expansion::Shift => rgb565_to_rgb888_shift(pixel),
            Expansion::Replicate => rgb565_to_rgb888(pixel),
        }
    }
}

impl FromStr for Expansion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "shift" => Ok(Expansion::Shift),
            "replicate" => Ok(Expansion::Replicate),
            _ => Err(Error::InvalidExpansion(s.to_string())),
        }
    }
}

impl std::fmt::Display for Expansion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expansion::Shift => write!(f, "shift"),
            Expansion::Replicate => write!(f, "replicate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("shift".parse::<Expansion>().unwrap(), Expansion::Shift);
        assert_eq!(
            "Replicate".parse::<Expansion>().unwrap(),
            Expansion::Replicate
        );
        assert!(matches!(
            "gamma".parse::<Expansion>(),
            Err(Error::InvalidExpansion(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for mode in [Expansion::Shift, Expansion::Replicate] {
            assert_eq!(mode.to_string().parse::<Expansion>().unwrap(), mode);
        }
    }

    #[test]
    fn test_modes_differ_on_white() {
        assert_eq!(Expansion::Shift.expand(0xFFFF), (0xF8, 0xF8, 0xF8));
        assert_eq!(Expansion::Replicate.expand(0xFFFF), (0xFF, 0xFF, 0xFF));
    }
}
