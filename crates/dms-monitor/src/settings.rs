//! Layered monitor settings
//!
//! Built-in defaults, then an optional settings file (any format the `config`
//! crate recognises by extension), then `MONITOR_*` environment variables with
//! `__` separating sections, e.g. `MONITOR_DMS__EAR_THRESHOLD=0.18`.

use std::path::Path;

use alerting::LedgerConfig;
use anyhow::Context;
use dms::DmsConfig;
use serde::{Deserialize, Serialize};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "MONITOR";

/// Frame geometry of the capture side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Requested capture width (pixels)
    pub frame_width: u32,
    /// Requested capture height (pixels)
    pub frame_height: u32,
    /// Resolution multiplier (e.g. 0.5, 1.0, 2.0)
    pub scale_factor: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_width: 1920,
            frame_height: 1080,
            scale_factor: 1.0,
        }
    }
}

impl CaptureConfig {
    /// Effective frame size after scaling
    pub fn frame_size(&self) -> (u32, u32) {
        (
            (self.frame_width as f32 * self.scale_factor) as u32,
            (self.frame_height as f32 * self.scale_factor) as u32,
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON log lines
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Everything the monitor binary needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub dms: DmsConfig,
    pub ledger: LedgerConfig,
    pub capture: CaptureConfig,
    pub logging: LoggingConfig,
}

impl MonitorSettings {
    /// Load settings from an optional file plus the environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: MonitorSettings = builder
            .build()
            .context("Failed to read monitor settings")?
            .try_deserialize()
            .context("Invalid monitor settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate every section
    pub fn validate(&self) -> anyhow::Result<()> {
        self.dms.validate().context("Invalid [dms] settings")?;
        self.ledger.validate().context("Invalid [ledger] settings")?;
        if !(self.capture.scale_factor > 0.0) {
            anyhow::bail!(
                "Invalid [capture] settings: scale_factor {} must be positive",
                self.capture.scale_factor
            );
        }
        Ok(())
    }
}
