use super::identity::Identity;
use super::vehicle::TierPolicy;
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};

/// The singleton system record: who administers the ledger, whether user
/// writes are paused, whether the ledger has been destroyed, and how
/// emission levels map to reward tiers.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SystemState {
    pub administrator: Identity,
    pub paused: bool,
    pub destroyed: bool,
    pub tier_policy: TierPolicy,
}

impl SystemState {
    pub fn new(administrator: Identity, tier_policy: TierPolicy) -> Self {
        Self {
            administrator,
            paused: false,
            destroyed: false,
            tier_policy,
        }
    }

    pub fn require_live(&self) -> Result<(), LedgerError> {
        if self.destroyed {
            Err(LedgerError::SystemDestroyed)
        } else {
            Ok(())
        }
    }

    pub fn require_administrator(&self, caller: &Identity) -> Result<(), LedgerError> {
        if *caller == self.administrator {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized)
        }
    }

    pub fn require_not_paused(&self) -> Result<(), LedgerError> {
        if self.paused {
            Err(LedgerError::SystemPaused)
        } else {
            Ok(())
        }
    }

    /// Gate for user writes: live and not paused.
    pub fn require_writable(&self) -> Result<(), LedgerError> {
        self.require_live()?;
        self.require_not_paused()
    }

    /// Gate for administrative actions: live and called by the administrator.
    pub fn require_admin_action(&self, caller: &Identity) -> Result<(), LedgerError> {
        self.require_live()?;
        self.require_administrator(caller)
    }
}
