//! Framebuffer grab tool
//!
//! Requests a screen dump from a remote display device and saves it as an
//! image file.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use fbgrab_core::{Expansion, Framebuffer, FRAME_BYTES, SCREEN_HEIGHT, SCREEN_WIDTH};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser)]
#[command(name = "fbgrab")]
#[command(about = "Grab the screen of a remote display device")]
#[command(version)]
struct Cli {
    /// Output image path, format from the extension (e.g. screen.png)
    output: PathBuf,

    /// Configuration file (TOML), defaults to config/default.toml if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device host, overrides the configuration
    #[arg(long)]
    host: Option<String>,

    /// Device port, overrides the configuration
    #[arg(long)]
    port: Option<u16>,

    /// Also save the undecoded capture to this path
    #[arg(long, conflicts_with = "from_raw")]
    raw: Option<PathBuf>,

    /// Decode a previously saved raw capture instead of connecting
    #[arg(long, conflicts_with_all = ["host", "port"])]
    from_raw: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let config = match Config::locate(cli.config.as_deref(), &cwd) {
        Some(path) => {
            let config = Config::load(&path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            info!("Loaded configuration from: {}", path.display());
            config
        }
        None => Config::default(),
    };
    let expansion = config.expansion()?;

    let raw = match &cli.from_raw {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read raw capture {}", path.display()))?,
        None => grab(&cli, &config).await?,
    };

    let rgb = decode_frame(&raw, expansion)?;
    output::save_rgb888(&cli.output, &rgb, SCREEN_WIDTH, SCREEN_HEIGHT)?;
    println!("Screenshot saved to: {}", cli.output.display());

    Ok(())
}

async fn grab(cli: &Cli, config: &Config) -> Result<Vec<u8>> {
    let mut params = config.connection_params();
    if let Some(host) = &cli.host {
        params.host = host.clone();
    }
    if let Some(port) = cli.port {
        params.port = port;
    }

    let capture = fbgrab_core::capture(&params)
        .await
        .with_context(|| format!("Failed to capture screen from {}", params.addr()))?;

    // Saved before the completeness check so broken transfers can be inspected
    if let Some(path) = &cli.raw {
        output::save_raw(path, &capture.data)?;
    }

    let raw = capture
        .into_frame(FRAME_BYTES)
        .with_context(|| format!("Incomplete capture from {}", params.addr()))?;
    Ok(raw)
}

fn decode_frame(raw: &[u8], expansion: Expansion) -> Result<Vec<u8>> {
    if raw.len() > FRAME_BYTES {
        warn!(
            "Ignoring {} bytes past the end of the frame",
            raw.len() - FRAME_BYTES
        );
    }

    let framebuffer = Framebuffer::from_device_dump(raw).context("Failed to decode framebuffer")?;
    info!(
        "Decoded {}x{} frame ({} expansion)",
        framebuffer.width(),
        framebuffer.height(),
        expansion
    );
    Ok(framebuffer.to_rgb888(expansion))
}
