use crate::domain::client::{Client, PaymentDay};
use crate::domain::money::{Amount, Rate};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of the clients table as it appears on disk.
#[derive(Debug, Deserialize)]
struct ClientRecord {
    id: u32,
    name: String,
    principal_amount: Decimal,
    #[serde(default)]
    monthly_percentage: Option<Decimal>,
    payment_day: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ClientRecord {
    fn into_client(self, default_rate: Rate) -> Result<Client> {
        let rate = match self.monthly_percentage {
            Some(percentage) => Rate::new(percentage)?,
            None => default_rate,
        };
        let client = Client {
            id: self.id,
            name: self.name,
            principal_amount: Amount::new(self.principal_amount)?,
            monthly_percentage: rate,
            payment_day: PaymentDay::new(self.payment_day)?,
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            is_active: self.is_active.unwrap_or(true),
        };
        client.validate()?;
        Ok(client)
    }
}

/// Reads clients from a CSV source.
///
/// Expected header: `id,name,principal_amount,monthly_percentage,payment_day,email,phone,is_active`.
/// The last four columns may be blank or missing. Rows are validated into
/// [`Client`] values as they are read.
pub struct ClientReader<R: Read> {
    reader: csv::Reader<R>,
    default_rate: Rate,
}

impl<R: Read> ClientReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_default_rate(source, Rate::default())
    }

    /// Uses `default_rate` for rows whose `monthly_percentage` is blank.
    pub fn with_default_rate(source: R, default_rate: Rate) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self {
            reader,
            default_rate,
        }
    }

    /// Lazily reads, deserializes and validates clients.
    pub fn clients(self) -> impl Iterator<Item = Result<Client>> {
        let default_rate = self.default_rate;
        self.reader
            .into_deserialize::<ClientRecord>()
            .map(move |result| {
                result
                    .map_err(LedgerError::from)
                    .and_then(|record| record.into_client(default_rate))
            })
    }
}
