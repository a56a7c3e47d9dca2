use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Device {port} unavailable: {message}")]
    DeviceUnavailable { port: String, message: String },

    #[error("Device stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Player name must not be empty")]
    EmptyPlayerName,

    #[error("Record store {path} unavailable: {message}")]
    StoreUnavailable { path: PathBuf, message: String },

    #[error("Failed to write record store {path}: {message}")]
    StoreWrite { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
