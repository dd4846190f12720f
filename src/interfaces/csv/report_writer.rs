use crate::application::report::{
    ClassifiedPayment, ClientTotal, MonthlyTotal, PortfolioSummary, UpcomingPayment,
};
use crate::config::AppConfig;
use crate::domain::client::Client;
use crate::domain::status::StatusKind;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct PaymentRow<'a> {
    id: u32,
    client_id: u32,
    client: &'a str,
    expected_date: NaiveDate,
    actual_date: NaiveDate,
    amount: String,
    status: StatusKind,
    days: u64,
    notes: &'a str,
}

#[derive(Serialize)]
struct UpcomingRow<'a> {
    client_id: u32,
    client: &'a str,
    due_date: NaiveDate,
    days_until: i64,
    expected_amount: String,
}

#[derive(Serialize)]
struct ClientRow<'a> {
    id: u32,
    name: &'a str,
    principal_amount: String,
    monthly_percentage: String,
    monthly_payment: String,
    payment_day: u32,
    next_due_date: NaiveDate,
}

#[derive(Serialize)]
struct MonthlyRow {
    month: String,
    total: String,
}

#[derive(Serialize)]
struct ClientTotalRow<'a> {
    client: &'a str,
    total: String,
}

/// Writes reports as CSV with a header row per report.
///
/// Decimal values are normalized (`50.00` is written as `50`).
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_payments<'a, I>(&mut self, payments: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ClassifiedPayment>,
    {
        let mut wrote_any = false;
        for p in payments {
            self.writer.serialize(PaymentRow {
                id: p.payment.id,
                client_id: p.payment.client_id,
                client: p.client_name_or_unknown(),
                expected_date: p.payment.expected_date,
                actual_date: p.payment.actual_date,
                amount: p.payment.amount.to_string(),
                status: p.status.kind(),
                days: p.status.days(),
                notes: p.payment.notes.as_deref().unwrap_or(""),
            })?;
            wrote_any = true;
        }
        if !wrote_any {
            self.writer.write_record([
                "id",
                "client_id",
                "client",
                "expected_date",
                "actual_date",
                "amount",
                "status",
                "days",
                "notes",
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_upcoming(&mut self, upcoming: &[UpcomingPayment]) -> Result<()> {
        if upcoming.is_empty() {
            self.writer.write_record([
                "client_id",
                "client",
                "due_date",
                "days_until",
                "expected_amount",
            ])?;
        }
        for u in upcoming {
            self.writer.serialize(UpcomingRow {
                client_id: u.client_id,
                client: &u.client_name,
                due_date: u.due_date,
                days_until: u.days_until,
                expected_amount: u.expected_amount.normalize().to_string(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes each client with its projected next due date after `reference`.
    pub fn write_clients(&mut self, clients: &[&Client], reference: NaiveDate) -> Result<()> {
        if clients.is_empty() {
            self.writer.write_record([
                "id",
                "name",
                "principal_amount",
                "monthly_percentage",
                "monthly_payment",
                "payment_day",
                "next_due_date",
            ])?;
        }
        for c in clients {
            self.writer.serialize(ClientRow {
                id: c.id,
                name: &c.name,
                principal_amount: c.principal_amount.to_string(),
                monthly_percentage: c.monthly_percentage.percentage().normalize().to_string(),
                monthly_payment: c.monthly_payment().normalize().to_string(),
                payment_day: c.payment_day.get(),
                next_due_date: c.next_due_date(reference)?,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes the summary as `metric,value` rows, amounts in `config`'s currency.
    pub fn write_summary(&mut self, summary: &PortfolioSummary, config: &AppConfig) -> Result<()> {
        let stats = &summary.payments;
        let average_late = stats
            .average_late_days
            .map(|avg| format!("{:.1}", avg.round_dp(1)))
            .unwrap_or_else(|| "N/A".to_string());

        let rows = [
            ("active_clients", summary.active_clients.to_string()),
            (
                "total_principal",
                config.format_amount(summary.total_principal.value()),
            ),
            (
                "expected_monthly_income",
                config.format_amount(summary.expected_monthly_income.value()),
            ),
            ("total_payments", stats.total_payments.to_string()),
            ("total_collected", config.format_amount(stats.total_amount.value())),
            (
                "collected_this_month",
                config.format_amount(stats.collected_this_month.value()),
            ),
            ("on_time_payments", stats.on_time.to_string()),
            ("late_payments", stats.late.to_string()),
            ("early_payments", stats.early.to_string()),
            ("average_late_days", average_late),
        ];

        self.writer.write_record(["metric", "value"])?;
        for (metric, value) in rows {
            self.writer.write_record([metric, value.as_str()])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_monthly_totals(&mut self, totals: &[MonthlyTotal]) -> Result<()> {
        if totals.is_empty() {
            self.writer.write_record(["month", "total"])?;
        }
        for t in totals {
            self.writer.serialize(MonthlyRow {
                month: format!("{:04}-{:02}", t.year, t.month),
                total: t.total.to_string(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_top_clients(&mut self, totals: &[ClientTotal]) -> Result<()> {
        if totals.is_empty() {
            self.writer.write_record(["client", "total"])?;
        }
        for t in totals {
            self.writer.serialize(ClientTotalRow {
                client: &t.client_name,
                total: t.total.to_string(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::report::{self, PaymentStats};
    use crate::domain::client::PaymentDay;
    use crate::domain::money::{Amount, Total};
    use crate::domain::payment::Payment;
    use crate::domain::schedule::parse_date;
    use rust_decimal_macros::dec;

    fn classified(id: u32, expected: &str, actual: &str) -> ClassifiedPayment {
        ClassifiedPayment::new(
            Payment {
                id,
                client_id: 1,
                expected_date: parse_date(expected).unwrap(),
                actual_date: parse_date(actual).unwrap(),
                amount: Amount::new(dec!(50.00)).unwrap(),
                notes: Some("transferencia".to_string()),
            },
            Some("Ana".to_string()),
        )
    }

    fn output(write: impl FnOnce(&mut ReportWriter<&mut Vec<u8>>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        {
            let mut writer = ReportWriter::new(&mut buf);
            write(&mut writer).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_payments() {
        let payments = vec![
            classified(1, "2024-03-01", "2024-03-05"),
            classified(2, "2024-04-05", "2024-04-01"),
        ];
        let out = output(|w| w.write_payments(&payments));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "id,client_id,client,expected_date,actual_date,amount,status,days,notes"
        );
        assert_eq!(lines[1], "1,1,Ana,2024-03-01,2024-03-05,50,late,4,transferencia");
        assert_eq!(lines[2], "2,1,Ana,2024-04-05,2024-04-01,50,early,4,transferencia");
    }

    #[test]
    fn test_write_empty_payments_keeps_header() {
        let out = output(|w| w.write_payments(std::iter::empty()));
        assert_eq!(
            out.trim(),
            "id,client_id,client,expected_date,actual_date,amount,status,days,notes"
        );
    }

    #[test]
    fn test_write_clients_and_upcoming() {
        let client = Client::new(
            3,
            "Carla",
            Amount::new(dec!(1200.00)).unwrap(),
            PaymentDay::new(31).unwrap(),
        );
        let reference = parse_date("2024-04-01").unwrap();

        let out = output(|w| w.write_clients(&[&client], reference));
        assert!(out.contains("3,Carla,1200,5,60,31,2024-04-30"));

        let upcoming = report::upcoming_due(&[client], reference, 30).unwrap();
        let out = output(|w| w.write_upcoming(&upcoming));
        assert!(out.starts_with("client_id,client,due_date,days_until,expected_amount"));
        assert!(out.contains("3,Carla,2024-04-30,29,60"));
    }

    #[test]
    fn test_write_summary() {
        let payments = vec![
            classified(1, "2024-03-01", "2024-03-05"),
            classified(2, "2024-04-01", "2024-04-02"),
        ];
        let summary = PortfolioSummary {
            active_clients: 1,
            total_principal: Total(dec!(1000)),
            expected_monthly_income: Total(dec!(50)),
            payments: PaymentStats::from_payments(&payments, parse_date("2024-04-15").unwrap()),
        };
        let out = output(|w| w.write_summary(&summary, &AppConfig::default()));
        assert!(out.starts_with("metric,value\n"));
        assert!(out.contains("total_principal,Q1000.00"));
        assert!(out.contains("collected_this_month,Q50.00"));
        assert!(out.contains("late_payments,2"));
        assert!(out.contains("average_late_days,2.5"));
    }

    #[test]
    fn test_write_summary_without_late_payments() {
        let summary = PortfolioSummary {
            active_clients: 0,
            total_principal: Total::ZERO,
            expected_monthly_income: Total::ZERO,
            payments: PaymentStats::from_payments(&[], parse_date("2024-04-15").unwrap()),
        };
        let out = output(|w| w.write_summary(&summary, &AppConfig::default()));
        assert!(out.contains("average_late_days,N/A"));
        assert!(out.contains("total_collected,Q0.00"));
    }

    #[test]
    fn test_write_monthly_and_top_clients() {
        let payments = vec![
            classified(1, "2024-03-01", "2024-03-05"),
            classified(2, "2024-04-01", "2024-04-02"),
        ];
        let out = output(|w| w.write_monthly_totals(&report::monthly_totals(&payments)));
        assert_eq!(out, "month,total\n2024-03,50\n2024-04,50\n");

        let out = output(|w| w.write_top_clients(&report::top_clients(&payments, 10)));
        assert_eq!(out, "client,total\nAna,100\n");
    }
}
