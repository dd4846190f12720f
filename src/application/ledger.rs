use super::report::{self, ClassifiedPayment, PortfolioSummary, UpcomingPayment};
use crate::domain::client::Client;
use crate::domain::payment::Payment;
use crate::domain::ports::{ClientStoreBox, PaymentStoreBox};
use crate::error::{LedgerError, Result};
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Prefilled values for a new payment from a given client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSuggestion {
    pub client_id: u32,
    pub expected_amount: Decimal,
    pub expected_date: NaiveDate,
}

/// The main entry point for client and payment bookkeeping.
///
/// `LedgerService` owns the storage backends and validates every change
/// before it is persisted. Reads join payments with their clients and derive
/// payment status through the schedule; nothing derived is stored.
pub struct LedgerService {
    client_store: ClientStoreBox,
    payment_store: PaymentStoreBox,
}

impl LedgerService {
    /// Creates a new `LedgerService`.
    ///
    /// # Arguments
    ///
    /// * `client_store` - The table of clients.
    /// * `payment_store` - The table of payments.
    pub fn new(client_store: ClientStoreBox, payment_store: PaymentStoreBox) -> Self {
        Self {
            client_store,
            payment_store,
        }
    }

    /// Registers a new client. Fails if the id is already taken.
    pub async fn add_client(&self, client: Client) -> Result<()> {
        client.validate()?;
        if self.client_store.get(client.id).await?.is_some() {
            return Err(LedgerError::ValidationError(format!(
                "Client {} already exists",
                client.id
            )));
        }
        info!("Registering client {} ({})", client.id, client.name);
        self.client_store.store(client).await
    }

    /// Replaces a client's details. `is_active` keeps its stored value;
    /// only [`LedgerService::deactivate_client`] changes it.
    pub async fn update_client(&self, mut client: Client) -> Result<()> {
        client.validate()?;
        let stored = self
            .client_store
            .get(client.id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("client {}", client.id)))?;
        if client.is_active != stored.is_active {
            debug!(
                "Ignoring is_active change for client {} on update",
                client.id
            );
            client.is_active = stored.is_active;
        }
        debug!("Updating client {}", client.id);
        self.client_store.store(client).await
    }

    /// Soft-deletes a client: its payments are removed and the client is
    /// marked inactive. Returns the number of payments removed.
    pub async fn deactivate_client(&self, client_id: u32) -> Result<usize> {
        let mut client = self
            .client_store
            .get(client_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("client {}", client_id)))?;

        let mut removed = 0;
        for payment in self.payment_store.get_all().await? {
            if payment.client_id == client_id {
                self.payment_store.remove(payment.id).await?;
                removed += 1;
            }
        }

        client.is_active = false;
        self.client_store.store(client).await?;
        info!(
            "Deactivated client {} and removed {} payments",
            client_id, removed
        );
        Ok(removed)
    }

    /// Records a payment for an active client. Fails on a duplicate id.
    pub async fn record_payment(&self, payment: Payment) -> Result<()> {
        self.require_active_client(payment.client_id).await?;
        if self.payment_store.exists(payment.id).await? {
            return Err(LedgerError::ValidationError(format!(
                "Payment {} already exists",
                payment.id
            )));
        }
        debug!(
            "Recording payment {} for client {}: {}",
            payment.id,
            payment.client_id,
            payment.status()
        );
        self.payment_store.store(payment).await
    }

    pub async fn update_payment(&self, payment: Payment) -> Result<()> {
        if !self.payment_store.exists(payment.id).await? {
            return Err(LedgerError::NotFound(format!("payment {}", payment.id)));
        }
        self.require_active_client(payment.client_id).await?;
        debug!("Updating payment {}", payment.id);
        self.payment_store.store(payment).await
    }

    pub async fn delete_payment(&self, payment_id: u32) -> Result<Payment> {
        self.payment_store
            .remove(payment_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("payment {}", payment_id)))
    }

    async fn require_active_client(&self, client_id: u32) -> Result<Client> {
        match self.client_store.get(client_id).await? {
            Some(client) if client.is_active => Ok(client),
            Some(_) => Err(LedgerError::ValidationError(format!(
                "Client {} is inactive",
                client_id
            ))),
            None => Err(LedgerError::NotFound(format!("client {}", client_id))),
        }
    }

    /// Active clients ordered by id.
    pub async fn active_clients(&self) -> Result<Vec<Client>> {
        let mut clients: Vec<Client> = self
            .client_store
            .get_all()
            .await?
            .into_iter()
            .filter(|c| c.is_active)
            .collect();
        clients.sort_by_key(|c| c.id);
        Ok(clients)
    }

    /// All payments with status and client name, most recent first.
    pub async fn classified_payments(&self) -> Result<Vec<ClassifiedPayment>> {
        let names: HashMap<u32, String> = self
            .client_store
            .get_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut payments: Vec<ClassifiedPayment> = self
            .payment_store
            .get_all()
            .await?
            .into_iter()
            .map(|p| {
                let name = names.get(&p.client_id).cloned();
                ClassifiedPayment::new(p, name)
            })
            .collect();
        payments.sort_by(|a, b| {
            b.payment
                .actual_date
                .cmp(&a.payment.actual_date)
                .then_with(|| a.payment.id.cmp(&b.payment.id))
        });
        Ok(payments)
    }

    /// Expected amount and due date for the client's next payment.
    pub async fn suggest_payment(
        &self,
        client_id: u32,
        reference: NaiveDate,
    ) -> Result<PaymentSuggestion> {
        let client = self.require_active_client(client_id).await?;
        Ok(PaymentSuggestion {
            client_id,
            expected_amount: client.monthly_payment(),
            expected_date: client.next_due_date(reference)?,
        })
    }

    pub async fn summary(&self, reference: NaiveDate) -> Result<PortfolioSummary> {
        let clients = self.active_clients().await?;
        let payments = self.classified_payments().await?;
        Ok(PortfolioSummary::compute(&clients, &payments, reference))
    }

    pub async fn upcoming(
        &self,
        reference: NaiveDate,
        horizon_days: u32,
        limit: Option<usize>,
    ) -> Result<Vec<UpcomingPayment>> {
        let clients = self.active_clients().await?;
        let mut upcoming = report::upcoming_due(&clients, reference, horizon_days)?;
        if let Some(limit) = limit {
            upcoming.truncate(limit);
        }
        Ok(upcoming)
    }
}
