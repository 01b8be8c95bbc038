use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Host environment the till runs in
///
/// A browser host has no Bluetooth stack and cannot open raw TCP sockets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostPlatform {
    #[default]
    Native,
    Browser,
}

impl FromStr for HostPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(HostPlatform::Native),
            "browser" | "web" => Ok(HostPlatform::Browser),
            other => Err(format!("Unknown host platform: {}", other)),
        }
    }
}

/// Printer service configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | directory holding the settings database |
/// | SETTINGS_DB | printer.redb | settings database file name |
/// | HOST_PLATFORM | native | `native` or `browser` |
/// | LOG_LEVEL | info | log level |
/// | LOG_DIR | (unset) | daily rolling log files |
/// | PRINTER_TIMEOUT_MS | 5000 | connect/write timeout |
/// | RFCOMM_DEVICE | /dev/rfcomm0 | serial node Bluetooth printers are bound to |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub settings_db: String,
    pub platform: HostPlatform,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub printer_timeout_ms: u64,
    pub rfcomm_device: String,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            settings_db: std::env::var("SETTINGS_DB").unwrap_or_else(|_| "printer.redb".into()),
            platform: std::env::var("HOST_PLATFORM")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            printer_timeout_ms: std::env::var("PRINTER_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(5000),
            rfcomm_device: std::env::var("RFCOMM_DEVICE")
                .unwrap_or_else(|_| "/dev/rfcomm0".into()),
        }
    }

    /// Full path of the settings database
    pub fn settings_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.settings_db)
    }

    pub fn printer_timeout(&self) -> Duration {
        Duration::from_millis(self.printer_timeout_ms)
    }

    pub fn is_browser(&self) -> bool {
        self.platform == HostPlatform::Browser
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
