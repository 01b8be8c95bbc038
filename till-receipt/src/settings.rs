//! Persisted printer configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use till_printer::DEFAULT_NETWORK_PORT;

/// Which channel carries print data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    #[default]
    Bluetooth,
    Network,
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionType::Bluetooth => write!(f, "bluetooth"),
            ConnectionType::Network => write!(f, "network"),
        }
    }
}

/// Receipt roll width
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperWidth {
    #[serde(rename = "58mm")]
    Mm58,
    #[default]
    #[serde(rename = "80mm")]
    Mm80,
}

impl PaperWidth {
    /// Character columns on one printed line
    pub fn chars_per_line(self) -> usize {
        match self {
            PaperWidth::Mm58 => 32,
            PaperWidth::Mm80 => 48,
        }
    }
}

impl fmt::Display for PaperWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperWidth::Mm58 => write!(f, "58mm"),
            PaperWidth::Mm80 => write!(f, "80mm"),
        }
    }
}

/// Cash drawer solenoid voltage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawerVoltage {
    #[default]
    #[serde(rename = "12v")]
    V12,
    #[serde(rename = "24v")]
    V24,
}

impl DrawerVoltage {
    /// Drive-select byte of the `ESC p` pulse
    pub fn pulse_select_byte(self) -> u8 {
        match self {
            DrawerVoltage::V12 => 0x00,
            DrawerVoltage::V24 => 0x01,
        }
    }
}

/// Printer settings record
///
/// Stored as one JSON value; see [`crate::storage::SettingsStorage`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterSettings {
    #[serde(default)]
    pub connection_type: ConnectionType,
    #[serde(default)]
    pub paper_width: PaperWidth,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub device_address: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub is_connected: bool,
    #[serde(default)]
    pub auto_connect: bool,
    #[serde(default)]
    pub cash_drawer_enabled: bool,
    #[serde(default)]
    pub cash_drawer_voltage: DrawerVoltage,
}

impl PrinterSettings {
    /// Network endpoint, when both halves are configured
    pub fn network_endpoint(&self) -> Option<(&str, u16)> {
        match (self.ip_address.as_deref(), self.port) {
            (Some(ip), Some(port)) if !ip.is_empty() => Some((ip, port)),
            _ => None,
        }
    }

    /// Whether the configured connection type has an endpoint to reach
    pub fn has_endpoint(&self) -> bool {
        match self.connection_type {
            ConnectionType::Bluetooth => self
                .device_address
                .as_deref()
                .is_some_and(|address| !address.is_empty()),
            ConnectionType::Network => self.network_endpoint().is_some(),
        }
    }

    /// Bluetooth settings after a successful connect
    pub fn with_bluetooth(&self, address: &str, name: Option<&str>) -> Self {
        Self {
            connection_type: ConnectionType::Bluetooth,
            device_address: Some(address.to_string()),
            device_name: name.map(str::to_string),
            is_connected: true,
            ..self.clone()
        }
    }

    /// Network settings after a successful connect
    pub fn with_network(&self, ip: &str, port: Option<u16>) -> Self {
        Self {
            connection_type: ConnectionType::Network,
            ip_address: Some(ip.to_string()),
            port: Some(port.unwrap_or(DEFAULT_NETWORK_PORT)),
            is_connected: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PrinterSettings::default();
        assert_eq!(settings.connection_type, ConnectionType::Bluetooth);
        assert_eq!(settings.paper_width, PaperWidth::Mm80);
        assert!(!settings.is_connected);
        assert!(!settings.auto_connect);
        assert!(!settings.cash_drawer_enabled);
        assert_eq!(settings.cash_drawer_voltage, DrawerVoltage::V12);
    }

    #[test]
    fn test_chars_per_line() {
        assert_eq!(PaperWidth::Mm58.chars_per_line(), 32);
        assert_eq!(PaperWidth::Mm80.chars_per_line(), 48);
    }

    #[test]
    fn test_json_field_names() {
        let settings = PrinterSettings::default().with_network("10.0.0.9", None);
        let value = serde_json::to_value(&settings).unwrap();

        assert_eq!(value["connectionType"], "network");
        assert_eq!(value["paperWidth"], "80mm");
        assert_eq!(value["ipAddress"], "10.0.0.9");
        assert_eq!(value["port"], 9100);
        assert_eq!(value["isConnected"], true);
        assert_eq!(value["cashDrawerVoltage"], "12v");
    }

    #[test]
    fn test_with_bluetooth_keeps_drawer_config() {
        let base = PrinterSettings {
            cash_drawer_enabled: true,
            cash_drawer_voltage: DrawerVoltage::V24,
            paper_width: PaperWidth::Mm58,
            ..Default::default()
        };

        let next = base.with_bluetooth("00:11:22:33:44:55", Some("Counter"));
        assert!(next.is_connected);
        assert!(next.has_endpoint());
        assert_eq!(next.device_name.as_deref(), Some("Counter"));
        assert!(next.cash_drawer_enabled);
        assert_eq!(next.cash_drawer_voltage, DrawerVoltage::V24);
        assert_eq!(next.paper_width, PaperWidth::Mm58);
    }

    #[test]
    fn test_network_endpoint_requires_ip_and_port() {
        let mut settings = PrinterSettings {
            connection_type: ConnectionType::Network,
            ip_address: Some("10.0.0.9".to_string()),
            ..Default::default()
        };
        assert!(settings.network_endpoint().is_none());

        settings.port = Some(9100);
        assert_eq!(settings.network_endpoint(), Some(("10.0.0.9", 9100)));
    }
}
