//! Opening printer channels

use crate::config::Config;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use till_printer::{BluetoothChannel, Channel, NetworkChannel, PrintResult};

/// Opens a byte channel for a configured endpoint
///
/// The transport only ever talks to printers through this seam, so the
/// formatting core carries no platform I/O of its own.
#[async_trait]
pub trait ChannelConnector: Send + Sync {
    async fn open_bluetooth(&self, address: &str) -> PrintResult<Box<dyn Channel>>;

    async fn open_network(&self, ip: &str, port: u16) -> PrintResult<Box<dyn Channel>>;
}

/// Connector backed by real devices: RFCOMM serial nodes and raw TCP
#[derive(Debug, Clone)]
pub struct SystemConnector {
    timeout: Duration,
    rfcomm_device: PathBuf,
}

impl SystemConnector {
    pub fn new(timeout: Duration, rfcomm_device: impl Into<PathBuf>) -> Self {
        Self {
            timeout,
            rfcomm_device: rfcomm_device.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.printer_timeout(), &config.rfcomm_device)
    }
}

#[async_trait]
impl ChannelConnector for SystemConnector {
    async fn open_bluetooth(&self, address: &str) -> PrintResult<Box<dyn Channel>> {
        let channel =
            BluetoothChannel::new(address, &self.rfcomm_device)?.with_timeout(self.timeout);
        Ok(Box::new(channel))
    }

    async fn open_network(&self, ip: &str, port: u16) -> PrintResult<Box<dyn Channel>> {
        let channel = NetworkChannel::new(ip, port)?.with_timeout(self.timeout);
        Ok(Box::new(channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_system_connector_validates_endpoints() {
        let connector = SystemConnector::new(Duration::from_millis(100), "/dev/rfcomm0");

        assert!(connector.open_network("192.168.1.10", 9100).await.is_ok());
        assert!(connector.open_network("printer.local", 9100).await.is_err());
        assert!(connector.open_bluetooth("00:11:22:33:44:55").await.is_ok());
        assert!(connector.open_bluetooth("").await.is_err());
    }
}
