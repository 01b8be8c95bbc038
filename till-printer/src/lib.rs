//! # till-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Western single-byte code page conversion (WPC1252, so `£` is one column)
//! - Network printing (raw TCP, port 9100)
//! - Bluetooth printing through a bound RFCOMM serial device
//! - The cash drawer pulse command
//!
//! Business logic (WHAT to print) lives in `till-receipt`.
//!
//! ## Example
//!
//! ```ignore
//! use till_printer::{Channel, EscPosBuilder, NetworkChannel};
//!
//! let mut builder = EscPosBuilder::new(48);
//! builder.center();
//! builder.double_size();
//! builder.line("RECEIPT");
//! builder.reset_size();
//! builder.sep_double();
//! builder.cut();
//!
//! let channel = NetworkChannel::new("192.168.1.100", 9100)?;
//! channel.send(&builder.build()).await?;
//! ```

mod channel;
mod codepage;
mod error;
mod escpos;

// Re-exports
pub use channel::{BluetoothChannel, Channel, DEFAULT_NETWORK_PORT, NetworkChannel};
pub use codepage::{convert_to_cp1252, text_width, truncate_width};
pub use error::{PrintError, PrintResult};
pub use escpos::{EscPosBuilder, cash_drawer_pulse};
