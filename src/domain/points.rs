use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative reward point balance.
///
/// All arithmetic is checked: a credit that would wrap fails with
/// `Overflow`, and a debit larger than the balance fails with
/// `InsufficientPoints` instead of going negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Points(u64);

impl Points {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Adds `earned` to the balance.
    pub fn credit(self, earned: Points) -> Result<Self, LedgerError> {
        self.0
            .checked_add(earned.0)
            .map(Self)
            .ok_or(LedgerError::Overflow)
    }

    /// Removes `amount` from the balance if there is enough to cover it.
    pub fn debit(self, amount: RedeemAmount) -> Result<Self, LedgerError> {
        self.0
            .checked_sub(amount.value())
            .map(Self)
            .ok_or(LedgerError::InsufficientPoints {
                available: self,
                requested: amount.value(),
            })
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A strictly positive number of points to redeem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub struct RedeemAmount(u64);

impl RedeemAmount {
    pub fn new(value: u64) -> Result<Self, LedgerError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidAmount)
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}
