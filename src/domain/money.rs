use crate::error::LedgerError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A strictly positive monetary amount (principal or payment).
///
/// Construction goes through [`Amount::new`], including deserialization, so an
/// `Amount` held anywhere in the crate is always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::ValidationError(format!(
                "Amount must be positive, got {}",
                value
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Monthly interest rate expressed as a percentage of the principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rate(Decimal);

impl Rate {
    pub const DEFAULT_PERCENTAGE: Decimal = dec!(5.0);

    pub fn new(percentage: Decimal) -> Result<Self, LedgerError> {
        if percentage >= Decimal::ZERO {
            Ok(Self(percentage))
        } else {
            Err(LedgerError::ValidationError(format!(
                "Monthly percentage cannot be negative, got {}",
                percentage
            )))
        }
    }

    pub fn percentage(&self) -> Decimal {
        self.0
    }

    /// Interest owed for one month on `principal`.
    pub fn monthly_interest(&self, principal: Amount) -> Decimal {
        principal.value() * self.0 / dec!(100)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self(Self::DEFAULT_PERCENTAGE)
    }
}

impl TryFrom<Decimal> for Rate {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

/// Running total of amounts, used by the reporting aggregates.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Total(pub Decimal);

impl Total {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Add for Total {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Decimal> for Total {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 += rhs;
    }
}

impl AddAssign<Amount> for Total {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sum<Amount> for Total {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |mut acc, amount| {
            acc += amount;
            acc
        })
    }
}

impl Sum<Decimal> for Total {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        Self(iter.sum())
    }
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
