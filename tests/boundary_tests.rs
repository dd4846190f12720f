use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_boundary_identifiers() {
    let clients =
        common::clients_csv(&[&["4294967295", "Max", "1000000.0000", "5", "28", "", "", ""]])
            .unwrap();
    let payments = common::payments_csv(&[&[
        "4294967295",
        "4294967295",
        "2024-03-28",
        "2024-03-28",
        "50000",
        "",
    ]])
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("lendbook"));
    cmd.arg("payments")
        .arg("--clients")
        .arg(clients.path())
        .arg("--payments")
        .arg(payments.path());

    cmd.assert().success().stdout(predicate::str::contains(
        "4294967295,4294967295,Max,2024-03-28,2024-03-28,50000,on_time,0,",
    ));
}

#[test]
fn test_extreme_decimal_precision() {
    let clients = common::clients_csv(&[&["1", "Ana", "0.0001", "5", "1", "", "", ""]]).unwrap();
    let payments = common::payments_csv(&[
        &["1", "1", "2024-03-01", "2024-03-01", "0.0001", ""],
        &["2", "1", "2024-04-01", "2024-04-01", "0.0001", ""],
    ])
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("lendbook"));
    cmd.arg("top-clients")
        .arg("--clients")
        .arg(clients.path())
        .arg("--payments")
        .arg(payments.path());

    cmd.assert()
        .success()
        .stdout("client,total\nAna,0.0002\n");
}

#[test]
fn test_end_of_month_due_dates() {
    let clients = common::clients_csv(&[
        &["1", "Fin de mes", "100", "5", "31", "", "", ""],
        &["2", "Treinta", "100", "5", "30", "", "", ""],
    ])
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("lendbook"));
    cmd.arg("clients")
        .arg("--clients")
        .arg(clients.path())
        .args(["--as-of", "2024-02-10"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,Fin de mes,100,5,5,31,2024-02-29"))
        .stdout(predicate::str::contains("2,Treinta,100,5,5,30,2024-02-29"));

    let mut cmd = Command::new(cargo_bin!("lendbook"));
    cmd.args(["next-due", "31", "--from", "2023-02-10"]);
    cmd.assert().success().stdout("2023-02-28\n");
}

#[test]
fn test_year_rollover() {
    let mut cmd = Command::new(cargo_bin!("lendbook"));
    cmd.args(["next-due", "5", "--from", "2024-12-20"]);
    cmd.assert().success().stdout("2025-01-05\n");

    let mut cmd = Command::new(cargo_bin!("lendbook"));
    cmd.args(["classify", "2024-12-31", "2025-01-02"]);
    cmd.assert().success().stdout("late,2\n");
}

#[test]
fn test_due_on_reference_date_moves_to_next_month() {
    let mut cmd = Command::new(cargo_bin!("lendbook"));
    cmd.args(["next-due", "15", "--from", "2024-03-15"]);
    cmd.assert().success().stdout("2024-04-15\n");
}
