use super::money::Amount;
use super::schedule;
use super::status::PaymentStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A payment received from a client against one monthly due date.
///
/// Status is derived from the two dates on demand and never stored.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: u32,
    pub client_id: u32,
    pub expected_date: NaiveDate,
    pub actual_date: NaiveDate,
    pub amount: Amount,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Payment {
    pub fn status(&self) -> PaymentStatus {
        schedule::classify(self.expected_date, self.actual_date)
    }
}
