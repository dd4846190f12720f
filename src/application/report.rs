//! Read-only aggregates over clients and classified payments.
//!
//! These back the dashboard, client list and payment list views: status
//! counts, upcoming due dates, portfolio totals, filtering and pagination.

use crate::domain::client::Client;
use crate::domain::money::Total;
use crate::domain::payment::Payment;
use crate::domain::schedule;
use crate::domain::status::{PaymentStatus, StatusKind};
use crate::error::Result;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const UNKNOWN_CLIENT: &str = "Unknown client";

/// A payment together with its derived status and owning client's name.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedPayment {
    pub payment: Payment,
    pub client_name: Option<String>,
    pub status: PaymentStatus,
}

impl ClassifiedPayment {
    pub fn new(payment: Payment, client_name: Option<String>) -> Self {
        let status = payment.status();
        Self {
            payment,
            client_name,
            status,
        }
    }

    pub fn client_name_or_unknown(&self) -> &str {
        self.client_name.as_deref().unwrap_or(UNKNOWN_CLIENT)
    }
}

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// Counts and averages over a set of payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentStats {
    pub total_payments: usize,
    pub total_amount: Total,
    pub on_time: usize,
    pub late: usize,
    pub early: usize,
    /// Mean magnitude of late payments only; `None` when nothing was late.
    pub average_late_days: Option<Decimal>,
    /// Sum of payments whose actual date falls in the reference month.
    pub collected_this_month: Total,
}

impl PaymentStats {
    pub fn from_payments(payments: &[ClassifiedPayment], reference: NaiveDate) -> Self {
        let mut stats = Self {
            total_payments: payments.len(),
            total_amount: Total::ZERO,
            on_time: 0,
            late: 0,
            early: 0,
            average_late_days: None,
            collected_this_month: Total::ZERO,
        };
        let mut late_days: u64 = 0;

        for p in payments {
            stats.total_amount += p.payment.amount;
            if same_month(p.payment.actual_date, reference) {
                stats.collected_this_month += p.payment.amount;
            }
            match p.status {
                PaymentStatus::Late { days } => {
                    stats.late += 1;
                    late_days += days;
                }
                PaymentStatus::OnTime => stats.on_time += 1,
                PaymentStatus::Early { .. } => stats.early += 1,
            }
        }

        if stats.late > 0 {
            stats.average_late_days =
                Some(Decimal::from(late_days) / Decimal::from(stats.late as u64));
        }
        stats
    }

    pub fn count(&self, kind: StatusKind) -> usize {
        match kind {
            StatusKind::Late => self.late,
            StatusKind::OnTime => self.on_time,
            StatusKind::Early => self.early,
        }
    }
}

/// A client whose next due date falls within the requested horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingPayment {
    pub client_id: u32,
    pub client_name: String,
    pub due_date: NaiveDate,
    pub days_until: i64,
    pub expected_amount: Decimal,
}

/// Active clients due within `horizon_days` (inclusive) of `reference`,
/// soonest first. Clients due on the same day keep their input order.
pub fn upcoming_due(
    clients: &[Client],
    reference: NaiveDate,
    horizon_days: u32,
) -> Result<Vec<UpcomingPayment>> {
    let mut upcoming = Vec::new();
    for client in clients.iter().filter(|c| c.is_active) {
        let due_date = client.next_due_date(reference)?;
        let days_until = schedule::days_until(due_date, reference);
        if (0..=i64::from(horizon_days)).contains(&days_until) {
            upcoming.push(UpcomingPayment {
                client_id: client.id,
                client_name: client.name.clone(),
                due_date,
                days_until,
                expected_amount: client.monthly_payment(),
            });
        }
    }
    upcoming.sort_by_key(|u| u.days_until);
    Ok(upcoming)
}

/// Portfolio-wide totals shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub active_clients: usize,
    pub total_principal: Total,
    pub expected_monthly_income: Total,
    pub payments: PaymentStats,
}

impl PortfolioSummary {
    pub fn compute(clients: &[Client], payments: &[ClassifiedPayment], reference: NaiveDate) -> Self {
        let active: Vec<&Client> = clients.iter().filter(|c| c.is_active).collect();
        Self {
            active_clients: active.len(),
            total_principal: active.iter().map(|c| c.principal_amount).sum(),
            expected_monthly_income: active.iter().map(|c| c.monthly_payment()).sum(),
            payments: PaymentStats::from_payments(payments, reference),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total: Total,
}

/// Amount collected per calendar month of the actual payment date, oldest first.
pub fn monthly_totals(payments: &[ClassifiedPayment]) -> Vec<MonthlyTotal> {
    let mut by_month: BTreeMap<(i32, u32), Total> = BTreeMap::new();
    for p in payments {
        let date = p.payment.actual_date;
        *by_month.entry((date.year(), date.month())).or_default() += p.payment.amount;
    }
    by_month
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal { year, month, total })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientTotal {
    pub client_name: String,
    pub total: Total,
}

/// Clients ranked by total amount paid, largest first, truncated to `limit`.
pub fn top_clients(payments: &[ClassifiedPayment], limit: usize) -> Vec<ClientTotal> {
    let mut by_client: HashMap<&str, Total> = HashMap::new();
    for p in payments {
        *by_client.entry(p.client_name_or_unknown()).or_default() += p.payment.amount;
    }
    let mut ranked: Vec<ClientTotal> = by_client
        .into_iter()
        .map(|(name, total)| ClientTotal {
            client_name: name.to_string(),
            total,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total
            .value()
            .cmp(&a.total.value())
            .then_with(|| a.client_name.cmp(&b.client_name))
    });
    ranked.truncate(limit);
    ranked
}

/// Criteria for narrowing the payment list. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub search: Option<String>,
    pub status: Option<StatusKind>,
    pub client_id: Option<u32>,
}

impl PaymentFilter {
    pub fn matches(&self, p: &ClassifiedPayment) -> bool {
        if let Some(status) = self.status
            && p.status.kind() != status
        {
            return false;
        }
        if let Some(client_id) = self.client_id
            && p.payment.client_id != client_id
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                p.client_name_or_unknown().to_lowercase().contains(&term)
                    || p
                        .payment
                        .notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&term))
                    || amount_matches(p.payment.amount.value(), &term)
            }
        }
    }

    pub fn apply<'a>(&self, payments: &'a [ClassifiedPayment]) -> Vec<&'a ClassifiedPayment> {
        payments.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Matches the amount as normalized (`50`), as stored (`50.0`) and with two
/// decimals (`50.00`).
fn amount_matches(amount: Decimal, term: &str) -> bool {
    [
        amount.normalize().to_string(),
        amount.to_string(),
        format!("{:.2}", amount),
    ]
    .iter()
    .any(|form| form.contains(term))
}

/// Free-text search over a client's name, email and phone.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub search: Option<String>,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                client.name.to_lowercase().contains(&term)
                    || client
                        .email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&term))
                    || client.phone.as_deref().is_some_and(|p| p.contains(&term))
            }
        }
    }
}

/// Returns the 1-based `page` of `items`. Out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        0
    } else {
        len.div_ceil(per_page)
    }
}
