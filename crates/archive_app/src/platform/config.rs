use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use archive_engine::{BackendSettings, EngineConfig, LivenessSettings, PacingSettings};
use serde::{Deserialize, Serialize};

use super::cli::Cli;

pub const DEFAULT_CONFIG_FILE: &str = "archive_fetch.ron";

/// Settings read from `archive_fetch.ron`. Every field is optional in the
/// file; command-line flags win over file values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub catalog: String,
    pub download_dir: PathBuf,
    pub health_interval_ms: u64,
    pub health_timeout_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub metadata_delay_ms: u64,
    pub transfer_delay_ms: u64,
    pub success_hold_ms: u64,
    pub failure_hold_ms: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: BackendSettings::default().base_url,
            catalog: "data.json".to_string(),
            download_dir: PathBuf::from("."),
            health_interval_ms: 5_000,
            health_timeout_ms: 3_000,
            request_timeout_ms: None,
            metadata_delay_ms: 200,
            transfer_delay_ms: 300,
            success_hold_ms: 800,
            failure_hold_ms: 1_500,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// The config file to read: `explicit` if given, otherwise the default
    /// file when it exists in the working directory.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        }
    }

    /// Reads the file [`AppConfig::locate`] picks, or returns built-in
    /// defaults when there is none. A given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(backend) = &cli.backend {
            self.backend_url = backend.clone();
        }
        if let Some(catalog) = &cli.catalog {
            self.catalog = catalog.clone();
        }
        if let Some(out) = &cli.out {
            self.download_dir = out.clone();
        }
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            backend: BackendSettings {
                base_url: self.backend_url.clone(),
                health_timeout: self.health_timeout(),
                request_timeout: self.request_timeout_ms.map(Duration::from_millis),
                ..BackendSettings::default()
            },
            liveness: LivenessSettings {
                interval: Duration::from_millis(self.health_interval_ms.max(1)),
            },
            pacing: PacingSettings {
                metadata_delay: Duration::from_millis(self.metadata_delay_ms),
                transfer_delay: Duration::from_millis(self.transfer_delay_ms),
                success_hold: Duration::from_millis(self.success_hold_ms),
                failure_hold: Duration::from_millis(self.failure_hold_ms),
            },
            download_dir: self.download_dir.clone(),
        }
    }
}
