#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use std::fs::File;
use std::io::Error;
use std::path::Path;
use tempfile::NamedTempFile;

pub const CLIENTS_FIXTURE: &str = "tests/fixtures/clients.csv";
pub const PAYMENTS_FIXTURE: &str = "tests/fixtures/payments.csv";

pub const CLIENT_HEADER: [&str; 8] = [
    "id",
    "name",
    "principal_amount",
    "monthly_percentage",
    "payment_day",
    "email",
    "phone",
    "is_active",
];

pub const PAYMENT_HEADER: [&str; 6] = [
    "id",
    "client_id",
    "expected_date",
    "actual_date",
    "amount",
    "notes",
];

fn write_table(header: &[&str], rows: &[&[&str]]) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(file.path())?;
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(*row)?;
    }
    wtr.flush()?;
    Ok(file)
}

pub fn clients_csv(rows: &[&[&str]]) -> Result<NamedTempFile, Error> {
    write_table(&CLIENT_HEADER, rows)
}

pub fn payments_csv(rows: &[&[&str]]) -> Result<NamedTempFile, Error> {
    write_table(&PAYMENT_HEADER, rows)
}

/// Writes `clients` clients due on days 1..=28 in rotation and
/// `payments_per_client` monthly payments for each, starting January 2020.
pub fn generate_ledger(
    clients_path: &Path,
    payments_path: &Path,
    clients: u32,
    payments_per_client: u32,
) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(File::create(clients_path)?);
    wtr.write_record(CLIENT_HEADER)?;
    for id in 1..=clients {
        let day = (id - 1) % 28 + 1;
        wtr.write_record([
            id.to_string(),
            format!("Client {}", id),
            "1000.00".to_string(),
            "5".to_string(),
            day.to_string(),
            String::new(),
            String::new(),
            "true".to_string(),
        ])?;
    }
    wtr.flush()?;

    let mut wtr = csv::WriterBuilder::new().from_writer(File::create(payments_path)?);
    wtr.write_record(PAYMENT_HEADER)?;
    let mut payment_id = 1;
    for client in 1..=clients {
        let day = (client - 1) % 28 + 1;
        for n in 0..payments_per_client {
            let expected = NaiveDate::from_ymd_opt(2020 + (n / 12) as i32, n % 12 + 1, day)
                .expect("days 1..=28 exist in every month");
            // Alternates late by two days and on time.
            let actual = if n % 2 == 0 {
                expected + Days::new(2)
            } else {
                expected
            };
            wtr.write_record([
                payment_id.to_string(),
                client.to_string(),
                expected.to_string(),
                actual.to_string(),
                "50.00".to_string(),
                String::new(),
            ])?;
            payment_id += 1;
        }
    }
    wtr.flush()?;
    Ok(())
}
