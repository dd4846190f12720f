use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Application settings, loaded from an optional JSON file.
///
/// Every key is optional; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Symbol prefixed to amounts in human-readable output.
    pub currency: String,
    /// Rate applied to clients whose record leaves it blank.
    pub default_monthly_percentage: Decimal,
    pub items_per_page: usize,
    pub upcoming_horizon_days: u32,
    pub upcoming_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency: "Q".to_string(),
            default_monthly_percentage: crate::domain::money::Rate::DEFAULT_PERCENTAGE,
            items_per_page: 10,
            upcoming_horizon_days: 30,
            upcoming_limit: 5,
        }
    }
}

impl AppConfig {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Formats `amount` with the configured currency and two decimals.
    pub fn format_amount(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.currency, amount.round_dp(2))
    }
}
