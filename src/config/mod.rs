mod seed;
pub use seed::SeedConfig;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::state::SCORE_MAX;

/// Config file read when `RIVERWATCH_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "riverwatch.toml";

/// Complete Riverwatch configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiverwatchConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

/// HTTP/WebSocket listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:4000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

/// Broadcast loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// Tick period (milliseconds)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Snapshots a subscriber may have queued before it is dropped
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
    /// Max time for one WebSocket write (milliseconds)
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_subscriber_buffer() -> usize {
    16
}

fn default_send_timeout_ms() -> u64 {
    2000
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            subscriber_buffer: default_subscriber_buffer(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl BroadcastConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

impl RiverwatchConfig {
    /// Apply environment overrides, falling back to current values.
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("RIVERWATCH_LISTEN_ADDR") {
            self.server.listen_addr = v;
        }
        if let Some(v) = lookup("RIVERWATCH_INTERVAL_MS") {
            match v.parse::<u64>() {
                Ok(ms) => self.broadcast.interval_ms = ms,
                Err(_) => warn!(value = %v, "Ignoring invalid RIVERWATCH_INTERVAL_MS"),
            }
        }
    }

    /// Reject settings the broadcast loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.broadcast.interval_ms == 0 {
            bail!("broadcast.interval_ms must be greater than zero");
        }
        if self.broadcast.subscriber_buffer == 0 {
            bail!("broadcast.subscriber_buffer must be greater than zero");
        }
        if self.broadcast.send_timeout_ms == 0 {
            bail!("broadcast.send_timeout_ms must be greater than zero");
        }

        let max = SCORE_MAX as u8;
        let mut river_ids = HashSet::new();
        for river in &self.seed.rivers {
            if river.risk > max {
                bail!("river {} risk {} is outside 0..={}", river.id, river.risk, max);
            }
            if !river.level.is_finite() {
                bail!("river {} level {} is not a finite number", river.id, river.level);
            }
            if !river_ids.insert(river.id) {
                bail!("duplicate river id {}", river.id);
            }
        }

        let mut zone_ids = HashSet::new();
        for zone in &self.seed.zones {
            if zone.severity > max {
                bail!("zone {} severity {} is outside 0..={}", zone.id, zone.severity, max);
            }
            if !zone_ids.insert(zone.id.as_str()) {
                bail!("duplicate zone id {}", zone.id);
            }
        }

        let mut camera_ids = HashSet::new();
        for camera in &self.seed.cameras {
            if camera.risk > max {
                bail!("camera {} risk {} is outside 0..={}", camera.id, camera.risk, max);
            }
            if !camera_ids.insert(camera.id.as_str()) {
                bail!("duplicate camera id {}", camera.id);
            }
        }

        Ok(())
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &Path) -> Result<RiverwatchConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: RiverwatchConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Resolve the effective configuration for the server process.
///
/// An explicit path must exist. Without one, `riverwatch.toml` is used if
/// present, otherwise defaults. Environment overrides are applied last.
pub fn load(path: Option<&Path>) -> Result<RiverwatchConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_config(default_path)?
            } else {
                RiverwatchConfig::default()
            }
        }
    };

    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
