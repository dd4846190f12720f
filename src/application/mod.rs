//! Application layer: bookkeeping operations and reporting.
//!
//! `LedgerService` orchestrates the storage ports for client and payment
//! changes; `report` holds the pure aggregates the views are built from.

pub mod ledger;
pub mod report;
