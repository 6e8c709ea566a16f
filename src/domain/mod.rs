//! Domain layer: ledger records, value objects, the reward formula and
//! the storage port.

pub mod access;
pub mod business;
pub mod command;
pub mod event;
pub mod identity;
pub mod points;
pub mod ports;
pub mod reward;
pub mod vehicle;
