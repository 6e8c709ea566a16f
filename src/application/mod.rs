//! Application layer containing the ledger service.
//!
//! This module defines the `RewardLedger`, the only entry point for
//! operations on the ledger, and the event-log replay used to audit it.

pub mod ledger;
pub mod replay;
