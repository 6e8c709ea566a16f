//! Adapters between the ledger and the outside world: CSV commands in,
//! CSV balances and JSON-lines events out.

pub mod csv;
pub mod json;
