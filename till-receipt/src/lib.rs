//! # till-receipt
//!
//! Receipt printing core for a point-of-sale till.
//!
//! - **Formatting** (`formatter`): a transaction rendered as ESC/POS bytes,
//!   as plain text, or as a diagnostic test page
//! - **Transport** (`transport`): printer settings, connection lifecycle and
//!   routing of encoded bytes to a Bluetooth or network channel
//! - **Storage** (`storage`): the settings record in an embedded redb file
//!
//! # Module layout
//!
//! ```text
//! till-receipt/src/
//! ├── config.rs      # environment configuration
//! ├── error.rs       # transport errors
//! ├── logger.rs      # tracing setup
//! ├── models.rs      # transaction and receipt value types
//! ├── settings.rs    # persisted printer settings
//! ├── storage.rs     # redb settings store
//! ├── formatter/     # receipt layouts
//! └── transport/     # connection lifecycle and channel routing
//! ```

pub mod config;
pub mod error;
pub mod formatter;
pub mod logger;
pub mod models;
pub mod settings;
pub mod storage;
pub mod transport;

pub use config::{Config, HostPlatform};
pub use error::{PrinterError, PrinterResult};
pub use formatter::ReceiptFormatter;
pub use models::{
    LineItem, PaymentRecord, ReceiptLine, ReceiptSettings, TerminalInfo, TextSize, Transaction,
};
pub use settings::{ConnectionType, DrawerVoltage, PaperWidth, PrinterSettings};
pub use storage::{SettingsStorage, SettingsStorageError};
pub use transport::{
    ChannelConnector, ConnectOutcome, PrinterTransport, SharedTransport, SystemConnector,
};

/// Create the work directory and start logging
pub fn setup_environment(config: &Config) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.work_dir)?;
    logger::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(())
}
