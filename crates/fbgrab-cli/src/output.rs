//! Image and raw dump output.

use anyhow::{Context, Result};
use image::ExtendedColorType;
use std::path::Path;
use tracing::debug;

/// Writes an RGB8 buffer as an image, format chosen by the file extension.
pub fn save_rgb888(path: &Path, rgb: &[u8], width: u16, height: u16) -> Result<()> {
    image::save_buffer(
        path,
        rgb,
        width as u32,
        height as u32,
        ExtendedColorType::Rgb8,
    )
    .with_context(|| format!("Failed to write image to {}", path.display()))?;

    debug!("Wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}

/// Writes the undecoded capture bytes.
pub fn save_raw(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data)
        .with_context(|| format!("Failed to write raw capture to {}", path.display()))?;

    debug!("Wrote {} raw bytes to {}", data.len(), path.display());
    Ok(())
}
