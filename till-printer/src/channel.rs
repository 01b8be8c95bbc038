//! Transport channels for sending ESC/POS data
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - Bluetooth printers bound to an RFCOMM serial device (e.g. `/dev/rfcomm0`)

use crate::error::{PrintError, PrintResult};
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Raw printing port used by most network thermal printers
pub const DEFAULT_NETWORK_PORT: u16 = 9100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A byte sink that reaches one printer
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send raw ESC/POS data to the printer
    async fn send(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is reachable
    async fn is_online(&self) -> bool;

    /// Release any resources held by the channel
    async fn close(&self) {}
}

/// Network printer channel (raw TCP)
///
/// Opens a fresh connection for every send, so nothing is held between jobs.
#[derive(Debug, Clone)]
pub struct NetworkChannel {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkChannel {
    /// Create a channel for `ip:port`
    pub fn new(ip: &str, port: u16) -> PrintResult<Self> {
        let ip: IpAddr = ip
            .trim()
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid IP address: {}", ip)))?;

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set connect and write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

#[async_trait]
impl Channel for NetworkChannel {
    #[instrument(skip(self, data), fields(addr = %self.addr, data_len = data.len()))]
    async fn send(&self, data: &[u8]) -> PrintResult<()> {
        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        tokio::time::timeout(self.timeout, async {
            stream.write_all(data).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", self.addr)))??;

        info!("Print job sent");
        Ok(())
    }

    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

/// Bluetooth printer channel
///
/// Writes to the serial device node the printer's address is bound to
/// (`rfcomm bind <dev> <address>` on Linux). An address that is itself a
/// path is used as the device node directly.
#[derive(Debug, Clone)]
pub struct BluetoothChannel {
    address: String,
    device: PathBuf,
    timeout: Duration,
}

impl BluetoothChannel {
    /// Create a channel for `address` bound to `device`
    pub fn new(address: &str, device: impl Into<PathBuf>) -> PrintResult<Self> {
        if address.trim().is_empty() {
            return Err(PrintError::InvalidConfig(
                "Empty Bluetooth address".to_string(),
            ));
        }

        let device = if address.starts_with('/') {
            PathBuf::from(address)
        } else {
            device.into()
        };

        Ok(Self {
            address: address.to_string(),
            device,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the device address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Get the serial device node
    pub fn device(&self) -> &Path {
        &self.device
    }
}

#[async_trait]
impl Channel for BluetoothChannel {
    #[instrument(skip(self, data), fields(address = %self.address, data_len = data.len()))]
    async fn send(&self, data: &[u8]) -> PrintResult<()> {
        let mut device = tokio::fs::OpenOptions::new()
            .write(true)
            .open(&self.device)
            .await
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.device.display(), e)))?;

        tokio::time::timeout(self.timeout, async {
            device.write_all(data).await?;
            device.flush().await
        })
        .await
        .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", self.address)))??;

        info!("Print job sent");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        tokio::fs::metadata(&self.device).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_network_channel_new() {
        let channel = NetworkChannel::new("192.168.1.100", DEFAULT_NETWORK_PORT).unwrap();
        assert_eq!(channel.addr().port(), 9100);
    }

    #[test]
    fn test_network_channel_ipv6() {
        let channel = NetworkChannel::new("::1", 9100).unwrap();
        assert!(channel.addr().is_ipv6());
        assert_eq!(channel.addr().to_string(), "[::1]:9100");

        let channel = NetworkChannel::new("fe80::1", 9101).unwrap();
        assert_eq!(channel.addr().port(), 9101);
    }

    #[test]
    fn test_invalid_network_addr() {
        assert!(NetworkChannel::new("not an ip", 9100).is_err());
    }

    #[test]
    fn test_bluetooth_path_address_is_device() {
        let channel = BluetoothChannel::new("/dev/rfcomm3", "/dev/rfcomm0").unwrap();
        assert_eq!(channel.device(), Path::new("/dev/rfcomm3"));

        let channel = BluetoothChannel::new("00:11:22:33:44:55", "/dev/rfcomm0").unwrap();
        assert_eq!(channel.device(), Path::new("/dev/rfcomm0"));
        assert_eq!(channel.address(), "00:11:22:33:44:55");
    }

    #[test]
    fn test_bluetooth_empty_address() {
        assert!(BluetoothChannel::new("  ", "/dev/rfcomm0").is_err());
    }

    #[tokio::test]
    async fn test_network_send_delivers_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let reader = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let channel = NetworkChannel::new("127.0.0.1", port).unwrap();
        channel.send(&[0x1B, 0x40, b'o', b'k']).await.unwrap();
        drop(channel);

        assert_eq!(reader.await.unwrap(), vec![0x1B, 0x40, b'o', b'k']);
    }

    #[tokio::test]
    async fn test_bluetooth_send_writes_device() {
        let dir = tempfile::tempdir().unwrap();
        let device = dir.path().join("rfcomm0");
        std::fs::write(&device, b"").unwrap();

        let channel = BluetoothChannel::new("00:11:22:33:44:55", &device).unwrap();
        assert!(channel.is_online().await);
        channel.send(b"drawer").await.unwrap();

        assert_eq!(std::fs::read(&device).unwrap(), b"drawer".to_vec());
    }

    #[tokio::test]
    async fn test_bluetooth_missing_device() {
        let channel = BluetoothChannel::new("00:11:22:33:44:55", "/nonexistent/rfcomm9").unwrap();
        assert!(!channel.is_online().await);
        assert!(matches!(
            channel.send(b"x").await,
            Err(PrintError::Connection(_))
        ));
    }
}
