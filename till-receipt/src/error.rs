//! Printer transport errors

use crate::storage::SettingsStorageError;
use thiserror::Error;
use till_printer::PrintError;

#[derive(Debug, Error)]
pub enum PrinterError {
    /// Print attempted before a successful connect
    #[error("Printer not connected")]
    NotConnected,

    /// Channel unavailable in the current host environment
    #[error("Not supported on this platform: {0}")]
    UnsupportedOnPlatform(String),

    /// Bluetooth send without a device address
    #[error("No Bluetooth device configured")]
    NoDeviceConfigured,

    /// Network send without IP and port
    #[error("Network printer not configured")]
    NotConfigured,

    /// The channel write failed
    #[error("Transport error: {0}")]
    Transport(#[from] PrintError),

    #[error("Settings storage error: {0}")]
    Storage(#[from] SettingsStorageError),
}

pub type PrinterResult<T> = Result<T, PrinterError>;
