use super::client::Client;
use super::payment::Payment;
use crate::error::Result;
use async_trait::async_trait;

/// Table of clients, keyed by client id.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn store(&self, client: Client) -> Result<()>;
    async fn get(&self, client_id: u32) -> Result<Option<Client>>;
    async fn get_all(&self) -> Result<Vec<Client>>;
}

/// Table of payments, keyed by payment id.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn store(&self, payment: Payment) -> Result<()>;
    async fn get(&self, payment_id: u32) -> Result<Option<Payment>>;
    async fn get_all(&self) -> Result<Vec<Payment>>;
    async fn remove(&self, payment_id: u32) -> Result<Option<Payment>>;

    async fn exists(&self, payment_id: u32) -> Result<bool> {
        Ok(self.get(payment_id).await?.is_some())
    }
}

pub type ClientStoreBox = Box<dyn ClientStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type ClientStoreFactory = Box<dyn Fn() -> ClientStoreBox + Send + Sync>;
pub type PaymentStoreFactory = Box<dyn Fn() -> PaymentStoreBox + Send + Sync>;
