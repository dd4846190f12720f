use crate::domain::money::Amount;
use crate::domain::payment::Payment;
use crate::domain::schedule::parse_date;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of the payments table. Dates stay raw until validated so that a
/// bad date surfaces as `InvalidDate` rather than a generic CSV error.
#[derive(Debug, Deserialize)]
struct PaymentRecord {
    id: u32,
    client_id: u32,
    expected_date: String,
    actual_date: String,
    amount: Decimal,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<PaymentRecord> for Payment {
    type Error = LedgerError;

    fn try_from(record: PaymentRecord) -> Result<Self> {
        Ok(Payment {
            id: record.id,
            client_id: record.client_id,
            expected_date: parse_date(&record.expected_date)?,
            actual_date: parse_date(&record.actual_date)?,
            amount: Amount::new(record.amount)?,
            notes: record.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Reads payments from a CSV source.
///
/// Expected header: `id,client_id,expected_date,actual_date,amount,notes`.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads, deserializes and validates payments.
    pub fn payments(self) -> impl Iterator<Item = Result<Payment>> {
        self.reader
            .into_deserialize::<PaymentRecord>()
            .map(|result| result.map_err(LedgerError::from).and_then(Payment::try_from))
    }
}
