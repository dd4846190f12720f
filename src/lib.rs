//! Bookkeeping for lending clients and their monthly payments.
//!
//! Payment timeliness and due-date projection live in [`domain::schedule`];
//! everything else in the crate builds on those functions.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
