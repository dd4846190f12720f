use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timeliness of a payment relative to its expected date.
///
/// The magnitude is the absolute number of days between the two dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Late { days: u64 },
    OnTime,
    Early { days: u64 },
}

impl PaymentStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            PaymentStatus::Late { .. } => StatusKind::Late,
            PaymentStatus::OnTime => StatusKind::OnTime,
            PaymentStatus::Early { .. } => StatusKind::Early,
        }
    }

    /// Absolute day offset; 0 when on time.
    pub fn days(&self) -> u64 {
        match self {
            PaymentStatus::Late { days } | PaymentStatus::Early { days } => *days,
            PaymentStatus::OnTime => 0,
        }
    }

    pub fn is_late(&self) -> bool {
        matches!(self, PaymentStatus::Late { .. })
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Late { days } => write!(f, "{} days late", days),
            PaymentStatus::OnTime => write!(f, "on time"),
            PaymentStatus::Early { days } => write!(f, "{} days early", days),
        }
    }
}

/// Status without its magnitude, used for filtering and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Late,
    OnTime,
    Early,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Late => "late",
            StatusKind::OnTime => "on_time",
            StatusKind::Early => "early",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "late" => Ok(StatusKind::Late),
            "on_time" | "ontime" | "on-time" => Ok(StatusKind::OnTime),
            "early" => Ok(StatusKind::Early),
            other => Err(LedgerError::ValidationError(format!(
                "Unknown payment status '{}'",
                other
            ))),
        }
    }
}
