//! redb-based storage for the printer settings record

use crate::settings::PrinterSettings;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Settings table: key = record name, value = JSON
const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("printer_settings");

const SETTINGS_KEY: &str = "printer_settings";

#[derive(Debug, Error)]
pub enum SettingsStorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SettingsStorageResult<T> = Result<T, SettingsStorageError>;

/// Durable home of [`PrinterSettings`]
#[derive(Clone)]
pub struct SettingsStorage {
    db: Arc<Database>,
}

impl SettingsStorage {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> SettingsStorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open a database that lives only as long as this handle
    pub fn open_in_memory() -> SettingsStorageResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> SettingsStorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Read the stored record, `None` if nothing was saved yet
    pub fn load(&self) -> SettingsStorageResult<Option<PrinterSettings>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;

        match table.get(SETTINGS_KEY)? {
            Some(guard) => {
                let settings: PrinterSettings = serde_json::from_slice(guard.value())?;
                Ok(Some(settings))
            }
            None => Ok(None),
        }
    }

    /// Replace the stored record; durable once this returns
    pub fn save(&self, settings: &PrinterSettings) -> SettingsStorageResult<()> {
        let value = serde_json::to_vec(settings)?;
        self.put_raw(&value)?;
        debug!(bytes = value.len(), "Printer settings written");
        Ok(())
    }

    fn put_raw(&self, value: &[u8]) -> SettingsStorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            table.insert(SETTINGS_KEY, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Overwrite the record with arbitrary bytes
    #[cfg(test)]
    pub(crate) fn corrupt(&self) -> SettingsStorageResult<()> {
        self.put_raw(b"{not json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ConnectionType, DrawerVoltage, PaperWidth};

    #[test]
    fn test_load_empty() {
        let storage = SettingsStorage::open_in_memory().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let storage = SettingsStorage::open_in_memory().unwrap();
        let settings = PrinterSettings {
            paper_width: PaperWidth::Mm58,
            cash_drawer_enabled: true,
            cash_drawer_voltage: DrawerVoltage::V24,
            ..Default::default()
        }
        .with_network("192.168.1.50", Some(9101));

        storage.save(&settings).unwrap();
        assert_eq!(storage.load().unwrap(), Some(settings));
    }

    #[test]
    fn test_save_overwrites() {
        let storage = SettingsStorage::open_in_memory().unwrap();
        storage
            .save(&PrinterSettings::default().with_network("10.0.0.1", None))
            .unwrap();
        storage
            .save(&PrinterSettings::default().with_bluetooth("AA:BB", None))
            .unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.connection_type, ConnectionType::Bluetooth);
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let storage = SettingsStorage::open_in_memory().unwrap();
        storage.corrupt().unwrap();
        assert!(matches!(
            storage.load(),
            Err(SettingsStorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("printer.redb");

        {
            let storage = SettingsStorage::open(&path).unwrap();
            storage
                .save(&PrinterSettings::default().with_network("10.0.0.7", None))
                .unwrap();
        }

        let storage = SettingsStorage::open(&path).unwrap();
        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.ip_address.as_deref(), Some("10.0.0.7"));
        assert!(loaded.is_connected);
    }
}
