//! Configuration for the wavemesh node daemon.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Webcam capture settings.
    pub capture: CaptureSection,
    /// Encoder settings.
    pub encoder: EncoderSection,
    /// Share registry settings.
    pub shares: ShareSection,
    /// Logging settings.
    pub logging: LoggingSection,
}

/// Webcam capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSection {
    /// Delay between capture ticks in milliseconds.
    pub tick_interval_ms: u64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Channel count a frame must have to be processed.
    pub expected_channels: usize,
    /// Capacity of the outgoing packet queue.
    pub queue_capacity: usize,
}

/// Encoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSection {
    /// zstd compression level (1 = fast, 19 = max compression).
    pub zstd_level: i32,
}

/// Share registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareSection {
    /// Path of the JSON file holding the share list.
    pub store_path: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Optional log file path. If empty, logs to stderr.
    pub file: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            capture: CaptureSection::default(),
            encoder: EncoderSection::default(),
            shares: ShareSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50, // ~20 frames/second
            width: 640,
            height: 480,
            expected_channels: 3,
            queue_capacity: 32,
        }
    }
}

impl Default for EncoderSection {
    fn default() -> Self {
        Self { zstd_level: 1 }
    }
}

impl Default for ShareSection {
    fn default() -> Self {
        Self {
            store_path: "wavemesh-shares.json".into(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: String::new(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the default configuration to a file (for bootstrapping).
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        let cfg = Self::default();
        let text = toml::to_string_pretty(&cfg)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, text)
    }

    /// Convert capture settings into a `CaptureConfig`.
    pub fn to_capture_config(&self) -> wavemesh_core::CaptureConfig {
        wavemesh_core::CaptureConfig {
            tick_interval: Duration::from_millis(self.capture.tick_interval_ms.max(1)),
            expected_channels: self.capture.expected_channels,
            queue_capacity: self.capture.queue_capacity.max(1),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
