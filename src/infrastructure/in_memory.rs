use crate::domain::client::Client;
use crate::domain::payment::Payment;
use crate::domain::ports::{ClientStore, PaymentStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory table of clients.
///
/// Uses `Arc<RwLock<HashMap<u32, Client>>>` so clones share the same table.
#[derive(Default, Clone)]
pub struct InMemoryClientStore {
    clients: Arc<RwLock<HashMap<u32, Client>>>,
}

impl InMemoryClientStore {
    /// Creates a new, empty in-memory client store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn store(&self, client: Client) -> Result<()> {
        let mut clients = self.clients.write().await;
        clients.insert(client.id, client);
        Ok(())
    }

    async fn get(&self, client_id: u32) -> Result<Option<Client>> {
        let clients = self.clients.read().await;
        Ok(clients.get(&client_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Client>> {
        let clients = self.clients.read().await;
        Ok(clients.values().cloned().collect())
    }
}

/// A thread-safe in-memory table of payments.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<u32, Payment>>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn store(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment);
        Ok(())
    }

    async fn get(&self, payment_id: u32) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&payment_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.values().cloned().collect())
    }

    async fn remove(&self, payment_id: u32) -> Result<Option<Payment>> {
        let mut payments = self.payments.write().await;
        Ok(payments.remove(&payment_id))
    }

    async fn exists(&self, payment_id: u32) -> Result<bool> {
        let payments = self.payments.read().await;
        Ok(payments.contains_key(&payment_id))
    }
}
