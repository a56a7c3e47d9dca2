//! Startup configuration.
//!
//! Loaded once from a TOML file and fixed for the lifetime of a session.
//!
//! ```toml
//! [device]
//! port = "/dev/ttyACM0"
//! baud_rate = 9600
//! read_timeout_ms = 1000
//!
//! [records]
//! path = "game_records.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[cfg(target_os = "windows")]
pub const DEFAULT_PORT: &str = "COM3";
#[cfg(not(target_os = "windows"))]
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_RECORDS_PATH: &str = "game_records.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub records: RecordsConfig,
}

/// Serial connection to the target board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Port name or path (e.g., "COM3", "/dev/ttyACM0")
    pub port: String,
    pub baud_rate: u32,
    /// Upper bound on a single blocking read; also bounds cancellation latency
    pub read_timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl DeviceConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    pub path: PathBuf,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_RECORDS_PATH),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.device.port.trim().is_empty() {
            return Err(Error::InvalidConfig("device.port is empty".to_string()));
        }
        if self.device.baud_rate == 0 {
            return Err(Error::InvalidConfig("device.baud_rate must be > 0".to_string()));
        }
        if self.device.read_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "device.read_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
