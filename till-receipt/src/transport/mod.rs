//! Printer transport
//!
//! Owns the durable [`PrinterSettings`], the connection lifecycle and the
//! routing of encoded receipts to exactly one channel.
//!
//! # Flow
//!
//! ```text
//! connect_*()  -> settings recorded + persisted (no I/O yet)
//! print_*()    -> ReceiptFormatter -> send_data() -> channel opened lazily -> bytes
//! disconnect() -> channel closed, flag cleared + persisted
//! ```
//!
//! A transport is a single-owner handle: every operation takes `&mut self`.
//! Wrap it in [`SharedTransport`] to use it from several tasks; the mutex
//! then serializes whole jobs.

mod connector;

pub use connector::{ChannelConnector, SystemConnector};

use crate::config::{Config, HostPlatform};
use crate::error::{PrinterError, PrinterResult};
use crate::formatter::ReceiptFormatter;
use crate::models::{ReceiptSettings, TerminalInfo, Transaction};
use crate::settings::{ConnectionType, PrinterSettings};
use crate::storage::SettingsStorage;
use chrono::Local;
use std::sync::Arc;
use till_printer::{Channel, cash_drawer_pulse};
use tracing::{debug, info, instrument, warn};

/// Transport shared between tasks
pub type SharedTransport = Arc<tokio::sync::Mutex<PrinterTransport>>;

/// Result of a network connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Endpoint recorded, nothing known to stand in the way
    Ready,
    /// Endpoint recorded, but the host may block outbound raw sockets
    RawSocketMayBeBlocked,
}

pub struct PrinterTransport {
    settings: PrinterSettings,
    storage: SettingsStorage,
    platform: HostPlatform,
    connector: Arc<dyn ChannelConnector>,
    channel: Option<Box<dyn Channel>>,
}

impl PrinterTransport {
    /// Create a transport over `storage`, loading the stored settings
    pub fn new(
        platform: HostPlatform,
        storage: SettingsStorage,
        connector: Arc<dyn ChannelConnector>,
    ) -> Self {
        let mut transport = Self {
            settings: PrinterSettings::default(),
            storage,
            platform,
            connector,
            channel: None,
        };
        transport.settings = transport.load_settings();
        transport
    }

    /// Open the configured settings database with the system connector
    pub fn open(config: &Config) -> PrinterResult<Self> {
        let storage = SettingsStorage::open(config.settings_path())?;
        let connector = Arc::new(SystemConnector::from_config(config));
        Ok(Self::new(config.platform, storage, connector))
    }

    /// Read the stored settings
    ///
    /// An absent or unreadable record yields the defaults; this never fails.
    pub fn load_settings(&self) -> PrinterSettings {
        match self.storage.load() {
            Ok(Some(settings)) => {
                debug!(
                    connection = %settings.connection_type,
                    connected = settings.is_connected,
                    "Printer settings loaded"
                );
                settings
            }
            Ok(None) => {
                debug!("No stored printer settings, using defaults");
                PrinterSettings::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load printer settings, using defaults");
                PrinterSettings::default()
            }
        }
    }

    /// Replace the settings record
    ///
    /// Storage is written first; on failure the in-memory record is left as
    /// it was. Any open channel is dropped so the next send uses the new
    /// endpoint.
    pub async fn save_settings(&mut self, settings: PrinterSettings) -> PrinterResult<()> {
        self.storage.save(&settings)?;
        self.settings = settings;
        self.close_channel().await;
        Ok(())
    }

    pub fn settings(&self) -> &PrinterSettings {
        &self.settings
    }

    pub fn is_connected(&self) -> bool {
        self.settings.is_connected
    }

    /// Formatter for the configured paper width
    pub fn formatter(&self) -> ReceiptFormatter {
        ReceiptFormatter::new(self.settings.paper_width)
    }

    /// Record a Bluetooth printer as the active connection
    #[instrument(skip(self))]
    pub async fn connect_bluetooth(
        &mut self,
        address: &str,
        name: Option<&str>,
    ) -> PrinterResult<()> {
        if self.platform == HostPlatform::Browser {
            return Err(PrinterError::UnsupportedOnPlatform(
                "Bluetooth printing requires the native app".to_string(),
            ));
        }

        let settings = self.settings.with_bluetooth(address, name);
        self.save_settings(settings).await?;
        info!("Bluetooth printer connected");
        Ok(())
    }

    /// Record a network printer as the active connection
    ///
    /// `port` defaults to 9100. On a browser host the endpoint is still
    /// recorded and the outcome warns that raw sockets may be blocked.
    #[instrument(skip(self))]
    pub async fn connect_network(
        &mut self,
        ip: &str,
        port: Option<u16>,
    ) -> PrinterResult<ConnectOutcome> {
        let settings = self.settings.with_network(ip, port);
        self.save_settings(settings).await?;

        if self.platform == HostPlatform::Browser {
            warn!("Network printer recorded, but browsers may block raw socket connections");
            return Ok(ConnectOutcome::RawSocketMayBeBlocked);
        }

        info!("Network printer connected");
        Ok(ConnectOutcome::Ready)
    }

    /// Close the channel and clear the connected flag
    #[instrument(skip(self))]
    pub async fn disconnect(&mut self) -> PrinterResult<()> {
        let settings = PrinterSettings {
            is_connected: false,
            ..self.settings.clone()
        };
        self.save_settings(settings).await?;
        info!("Printer disconnected");
        Ok(())
    }

    /// Re-open the stored endpoint when auto-connect is on
    ///
    /// Only a printer still marked connected is restored; an explicit
    /// `disconnect()` stays in force. Returns whether a channel was opened.
    #[instrument(skip(self))]
    pub async fn restore_connection(&mut self) -> PrinterResult<bool> {
        if !self.settings.auto_connect
            || !self.settings.is_connected
            || !self.settings.has_endpoint()
        {
            debug!("Auto-connect off, printer disconnected or no stored endpoint");
            return Ok(false);
        }

        let channel = self.open_channel().await?;
        if !channel.is_online().await {
            warn!(connection = %self.settings.connection_type, "Stored printer not reachable yet");
        }

        self.close_channel().await;
        self.channel = Some(channel);

        info!(connection = %self.settings.connection_type, "Printer connection restored");
        Ok(true)
    }

    /// Print a customer receipt
    #[instrument(skip_all, fields(transaction_id = %transaction.id))]
    pub async fn print_receipt(
        &mut self,
        transaction: &Transaction,
        site_name: Option<&str>,
        is_reprint: bool,
        receipt_settings: Option<&ReceiptSettings>,
    ) -> PrinterResult<()> {
        self.ensure_connected()?;

        let data =
            self.formatter()
                .generate_receipt(transaction, site_name, is_reprint, receipt_settings);
        self.send_data(&data).await?;

        info!(is_reprint, "Receipt printed");
        Ok(())
    }

    /// Print the diagnostic page
    #[instrument(skip(self))]
    pub async fn print_test_receipt(&mut self) -> PrinterResult<()> {
        self.ensure_connected()?;

        let data = self
            .formatter()
            .generate_test_receipt(Local::now().naive_local());
        self.send_data(&data).await?;

        info!("Test receipt printed");
        Ok(())
    }

    /// Pulse the cash drawer
    ///
    /// A disabled drawer or a disconnected printer is a silent no-op.
    #[instrument(skip(self))]
    pub async fn open_cash_drawer(&mut self) -> PrinterResult<()> {
        if !self.settings.cash_drawer_enabled {
            debug!("Cash drawer disabled");
            return Ok(());
        }
        if !self.settings.is_connected {
            warn!("Cash drawer not opened: printer not connected");
            return Ok(());
        }

        let pulse = cash_drawer_pulse(self.settings.cash_drawer_voltage.pulse_select_byte());
        self.send_data(&pulse).await?;

        info!(voltage = ?self.settings.cash_drawer_voltage, "Cash drawer opened");
        Ok(())
    }

    /// Plain-text rendering at the configured paper width
    pub fn preview_receipt(
        &self,
        transaction: &Transaction,
        site_name: Option<&str>,
        receipt_settings: Option<&ReceiptSettings>,
        terminal: Option<&TerminalInfo>,
    ) -> String {
        self.formatter()
            .generate_receipt_text(transaction, site_name, receipt_settings, terminal)
    }

    fn ensure_connected(&self) -> PrinterResult<()> {
        if self.settings.is_connected {
            Ok(())
        } else {
            Err(PrinterError::NotConnected)
        }
    }

    /// Send bytes over the channel for the configured connection type
    async fn send_data(&mut self, data: &[u8]) -> PrinterResult<()> {
        debug!(
            connection = %self.settings.connection_type,
            bytes = data.len(),
            "Dispatching print data"
        );

        let channel = match self.channel.take() {
            Some(channel) => channel,
            None => self.open_channel().await?,
        };

        match channel.send(data).await {
            Ok(()) => {
                self.channel = Some(channel);
                Ok(())
            }
            Err(e) => {
                channel.close().await;
                Err(e.into())
            }
        }
    }

    /// Open a channel strictly for the configured connection type
    async fn open_channel(&self) -> PrinterResult<Box<dyn Channel>> {
        match self.settings.connection_type {
            ConnectionType::Bluetooth => {
                let address = self
                    .settings
                    .device_address
                    .as_deref()
                    .filter(|address| !address.is_empty())
                    .ok_or(PrinterError::NoDeviceConfigured)?;
                if self.platform == HostPlatform::Browser {
                    return Err(PrinterError::UnsupportedOnPlatform(
                        "Bluetooth is unavailable in the browser".to_string(),
                    ));
                }
                debug!(address, "Opening Bluetooth channel");
                Ok(self.connector.open_bluetooth(address).await?)
            }
            ConnectionType::Network => {
                if self.platform == HostPlatform::Browser {
                    return Err(PrinterError::UnsupportedOnPlatform(
                        "Raw TCP is unavailable in the browser".to_string(),
                    ));
                }
                let (ip, port) = self
                    .settings
                    .network_endpoint()
                    .ok_or(PrinterError::NotConfigured)?;
                debug!(ip, port, "Opening network channel");
                Ok(self.connector.open_network(ip, port).await?)
            }
        }
    }

    async fn close_channel(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.close().await;
        }
    }
}
