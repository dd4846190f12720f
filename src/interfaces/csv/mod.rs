//! CSV tables in, CSV reports out.

pub mod client_reader;
pub mod payment_reader;
pub mod report_writer;
