//! Domain model: clients, payments, money value objects and the payment schedule.

pub mod client;
pub mod money;
pub mod payment;
pub mod ports;
pub mod schedule;
pub mod status;
