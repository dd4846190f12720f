use super::money::{Amount, Rate};
use super::schedule;
use crate::error::{LedgerError, Result};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
/// Local eight-digit number, optionally prefixed with the 502 country code.
const PHONE_PATTERN: &str = r"^(\+?502)?[2-9]\d{7}$";

fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> Result<&'static Regex> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern).map_err(|e| LedgerError::InternalError(Box::new(e)))?;
    Ok(cell.get_or_init(|| re))
}

pub fn is_valid_email(email: &str) -> Result<bool> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    Ok(cached_regex(&EMAIL, EMAIL_PATTERN)?.is_match(email.trim()))
}

/// Spaces and dashes are ignored, so `5555-1234` and `+502 5555 1234` pass.
pub fn is_valid_phone(phone: &str) -> Result<bool> {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    let digits: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    Ok(cached_regex(&PHONE, PHONE_PATTERN)?.is_match(&digits))
}

/// Day of the month on which a client's payment recurs, always in `1..=31`.
///
/// Days that do not exist in a given month (31 in April, 30 in February) are
/// accepted here; the schedule clamps them to the month's last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PaymentDay(u8);

impl PaymentDay {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 31;

    pub fn new(day: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&day) {
            Ok(Self(day as u8))
        } else {
            Err(LedgerError::InvalidDay(day))
        }
    }

    pub fn get(&self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<i64> for PaymentDay {
    type Error = LedgerError;

    fn try_from(day: i64) -> Result<Self> {
        Self::new(day)
    }
}

impl From<PaymentDay> for i64 {
    fn from(day: PaymentDay) -> Self {
        i64::from(day.0)
    }
}

impl fmt::Display for PaymentDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A borrower with an outstanding principal and a monthly due day.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Client {
    pub id: u32,
    pub name: String,
    pub principal_amount: Amount,
    #[serde(default)]
    pub monthly_percentage: Rate,
    pub payment_day: PaymentDay,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Cleared when the client is deleted; inactive clients are kept for history.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Client {
    pub fn new(id: u32, name: impl Into<String>, principal: Amount, payment_day: PaymentDay) -> Self {
        Self {
            id,
            name: name.into(),
            principal_amount: principal,
            monthly_percentage: Rate::default(),
            payment_day,
            email: None,
            phone: None,
            is_active: true,
        }
    }

    pub fn with_rate(mut self, rate: Rate) -> Self {
        self.monthly_percentage = rate;
        self
    }

    /// Interest expected every month: principal × rate / 100.
    pub fn monthly_payment(&self) -> Decimal {
        self.monthly_percentage.monthly_interest(self.principal_amount)
    }

    /// Next due date strictly after `reference`.
    pub fn next_due_date(&self, reference: NaiveDate) -> Result<NaiveDate> {
        schedule::next_due_date(self.payment_day, reference)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::ValidationError(format!(
                "Client {} must have a name",
                self.id
            )));
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty())
            && !is_valid_email(email)?
        {
            return Err(LedgerError::ValidationError(format!(
                "Client {} has an invalid email: {}",
                self.id, email
            )));
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty())
            && !is_valid_phone(phone)?
        {
            return Err(LedgerError::ValidationError(format!(
                "Client {} has an invalid phone: {}",
                self.id, phone
            )));
        }
        Ok(())
    }
}
