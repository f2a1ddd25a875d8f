//! Configuration management.

use anyhow::{Context, Result};
use fbgrab_core::transport::{
    DEFAULT_CHUNK_SIZE, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST, DEFAULT_IDLE_TIMEOUT, DEFAULT_PORT,
    REQUEST_TOKEN,
};
use fbgrab_core::{ConnectionParams, Expansion};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Device endpoint
    #[serde(default)]
    pub device: DeviceConfig,

    /// Socket behaviour
    #[serde(default)]
    pub transport: TransportConfig,

    /// Pixel decoding
    #[serde(default)]
    pub decode: DecodeConfig,
}

/// Device endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Hostname or IP address
    #[serde(default = "default_host")]
    pub host: String,

    /// Screen server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request token sent after connecting
    #[serde(default = "default_token")]
    pub token: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token: default_token(),
        }
    }
}

/// Socket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Set SO_REUSEADDR before connecting
    #[serde(default = "default_reuse_address")]
    pub reuse_address: bool,

    /// Connect timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Idle read timeout in milliseconds, 0 disables it
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_ms: u64,

    /// Socket read size in bytes
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            reuse_address: default_reuse_address(),
            connect_timeout_ms: default_connect_timeout(),
            idle_timeout_ms: default_idle_timeout(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// Decoding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodeConfig {
    /// Channel expansion: "shift" or "replicate"
    #[serde(default = "default_expansion")]
    pub expansion: String,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            expansion: default_expansion(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_token() -> String {
    String::from_utf8_lossy(REQUEST_TOKEN).into_owned()
}

fn default_reuse_address() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT.as_millis() as u64
}

fn default_idle_timeout() -> u64 {
    DEFAULT_IDLE_TIMEOUT.as_millis() as u64
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_expansion() -> String {
    Expansion::default().to_string()
}

/// Configuration file used when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

impl Config {
    /// Picks the configuration file to load.
    ///
    /// An explicit path always wins. Otherwise [`DEFAULT_CONFIG_PATH`] is used
    /// if it exists relative to `base`; with neither, built-in defaults apply.
    pub fn locate(explicit: Option<&Path>, base: &Path) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let fallback = base.join(DEFAULT_CONFIG_PATH);
        fallback.is_file().then_some(fallback)
    }

    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Builds capture parameters from the device and transport sections.
    pub fn connection_params(&self) -> ConnectionParams {
        let idle_timeout = match self.transport.idle_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        ConnectionParams {
            host: self.device.host.clone(),
            port: self.device.port,
            token: self.device.token.as_bytes().to_vec(),
            reuse_address: self.transport.reuse_address,
            connect_timeout: Duration::from_millis(self.transport.connect_timeout_ms),
            idle_timeout,
            chunk_size: self.transport.chunk_size,
        }
    }

    /// Parses the configured channel expansion.
    pub fn expansion(&self) -> Result<Expansion> {
        self.decode
            .expansion
            .parse()
            .context("Invalid [decode] expansion")
    }
}
