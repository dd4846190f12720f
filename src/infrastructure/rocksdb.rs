use crate::domain::client::Client;
use crate::domain::payment::Payment;
use crate::domain::ports::{ClientStore, PaymentStore};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing clients.
pub const CF_CLIENTS: &str = "clients";
/// Column Family for storing payments.
pub const CF_PAYMENTS: &str = "payments";

fn internal(msg: String) -> LedgerError {
    LedgerError::InternalError(Box::new(std::io::Error::other(msg)))
}

/// A persistent store implementation using RocksDB.
///
/// Clients and payments live in separate Column Families, keyed by their id
/// in big-endian bytes and stored as JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("clients" and "payments") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_clients = ColumnFamilyDescriptor::new(CF_CLIENTS, Options::default());
        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_clients, cf_payments])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| internal(format!("{} column family not found", name)))
    }

    fn put<T: Serialize>(&self, cf_name: &str, id: u32, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| internal(format!("Serialization error: {}", e)))?;
        self.db.put_cf(cf, id.to_be_bytes(), bytes)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, cf_name: &str, id: u32) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| internal(format!("Deserialization error: {}", e))),
            None => Ok(None),
        }
    }

    fn fetch_all<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut items = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) =
                item.map_err(|e| internal(format!("RocksDB iteration error: {}", e)))?;
            let decoded = serde_json::from_slice(&value)
                .map_err(|e| internal(format!("Deserialization error: {}", e)))?;
            items.push(decoded);
        }
        Ok(items)
    }
}

#[async_trait]
impl ClientStore for RocksDBStore {
    async fn store(&self, client: Client) -> Result<()> {
        self.put(CF_CLIENTS, client.id, &client)
    }

    async fn get(&self, client_id: u32) -> Result<Option<Client>> {
        self.fetch(CF_CLIENTS, client_id)
    }

    async fn get_all(&self) -> Result<Vec<Client>> {
        self.fetch_all(CF_CLIENTS)
    }
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn store(&self, payment: Payment) -> Result<()> {
        self.put(CF_PAYMENTS, payment.id, &payment)
    }

    async fn get(&self, payment_id: u32) -> Result<Option<Payment>> {
        self.fetch(CF_PAYMENTS, payment_id)
    }

    async fn get_all(&self) -> Result<Vec<Payment>> {
        self.fetch_all(CF_PAYMENTS)
    }

    async fn remove(&self, payment_id: u32) -> Result<Option<Payment>> {
        let existing: Option<Payment> = self.fetch(CF_PAYMENTS, payment_id)?;
        if existing.is_some() {
            let cf = self.cf(CF_PAYMENTS)?;
            self.db.delete_cf(cf, payment_id.to_be_bytes())?;
        }
        Ok(existing)
    }

    async fn exists(&self, payment_id: u32) -> Result<bool> {
        let cf = self.cf(CF_PAYMENTS)?;
        // Only checks the key; the value is not decoded.
        let result = self.db.get_pinned_cf(cf, payment_id.to_be_bytes())?;
        Ok(result.is_some())
    }
}
