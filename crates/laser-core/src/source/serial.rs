use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use super::{LineReader, LineSource};
use crate::cancel::CancelToken;
use crate::config::DeviceConfig;
use crate::error::{Error, Result};

/// The target board on a serial port
#[derive(Debug, Clone)]
pub struct SerialSource {
    port_name: String,
    baud_rate: u32,
    timeout: Duration,
}

impl SerialSource {
    pub fn new(port_name: impl Into<String>, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            timeout,
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(config.port.clone(), config.baud_rate, config.read_timeout())
    }
}

impl LineSource for SerialSource {
    type Reader = LineReader<Box<dyn SerialPort>>;

    fn describe(&self) -> String {
        format!("{} @ {} baud", self.port_name, self.baud_rate)
    }

    fn open(&mut self, _cancel: &CancelToken) -> Result<Self::Reader> {
        debug!(
            "Opening {} (read timeout {}ms)",
            self.describe(),
            self.timeout.as_millis()
        );
        let port = serialport::new(&self.port_name, self.baud_rate)
            .timeout(self.timeout)
            .open()
            .map_err(|e| Error::DeviceUnavailable {
                port: self.port_name.clone(),
                message: e.to_string(),
            })?;
        info!("Connected to {}", self.describe());
        Ok(LineReader::new(port))
    }
}

/// Names of the serial ports visible to this host
pub fn available_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(|e| Error::DeviceUnavailable {
        port: "*".to_string(),
        message: format!("failed to list serial ports: {}", e),
    })?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
