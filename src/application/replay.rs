use crate::domain::event::{EventRecord, LedgerEvent};
use crate::domain::identity::Identity;
use crate::domain::points::{Points, RedeemAmount};
use crate::domain::reward;
use crate::domain::vehicle::Tier;
use crate::error::{LedgerError, Result};
use std::collections::BTreeMap;

/// Ledger state rebuilt purely from the event log.
///
/// Replay re-checks every event against the rules the live ledger applies:
/// registrations are unique, user events never land while paused or after
/// destruction, redemptions stay within balance at a registered business,
/// and each mileage credit is exactly `miles * tier` for the owner's
/// stored tier. A log that breaks any of them fails with
/// `InvariantViolation`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LedgerProjection {
    pub balances: BTreeMap<Identity, Points>,
    /// Owner to vehicle id.
    pub vehicles: BTreeMap<Identity, u64>,
    /// Business identity to name.
    pub businesses: BTreeMap<Identity, String>,
    pub paused: bool,
    pub destroyed: bool,
}

impl LedgerProjection {
    /// Replays `events` in order.
    ///
    /// `tiers` maps each vehicle owner to the tier on its stored record.
    /// A record's tier is fixed at registration, so it prices every
    /// mileage report that owner ever made.
    pub fn replay(events: &[EventRecord], tiers: &BTreeMap<Identity, Tier>) -> Result<Self> {
        let mut projection = Self::default();
        for (index, record) in events.iter().enumerate() {
            let expected = index as u64 + 1;
            if record.sequence != expected {
                return Err(violation(
                    record,
                    format!("expected sequence {}", expected),
                ));
            }
            projection.apply(record, tiers)?;
        }
        Ok(projection)
    }

    fn apply(&mut self, record: &EventRecord, tiers: &BTreeMap<Identity, Tier>) -> Result<()> {
        if self.destroyed {
            return Err(violation(record, "event after destruction"));
        }
        if self.paused && record.event.is_user_action() {
            return Err(violation(record, "user action while paused"));
        }

        match &record.event {
            LedgerEvent::VehicleRegistered {
                owner, vehicle_id, ..
            } => {
                if !tiers.contains_key(owner) {
                    return Err(violation(record, format!("{} has no stored vehicle", owner)));
                }
                if self.vehicles.insert(owner.clone(), *vehicle_id).is_some() {
                    return Err(violation(record, format!("{} registered twice", owner)));
                }
            }
            LedgerEvent::MileageReported {
                owner,
                miles,
                total_points,
                ..
            } => {
                let tier = match tiers.get(owner) {
                    Some(tier) if self.vehicles.contains_key(owner) => *tier,
                    _ => return Err(violation(record, format!("{} has no vehicle", owner))),
                };
                let balance = self.balances.entry(owner.clone()).or_default();
                let expected = reward::points_for_mileage(*miles, tier)
                    .and_then(|earned| balance.credit(earned))
                    .map_err(|e| violation(record, e.to_string()))?;
                if *total_points != expected {
                    return Err(violation(
                        record,
                        format!(
                            "total {} does not match {} + {} miles at tier {}",
                            total_points, balance, miles, tier
                        ),
                    ));
                }
                *balance = expected;
            }
            LedgerEvent::BusinessRegistered { business, name } => {
                if self
                    .businesses
                    .insert(business.clone(), name.clone())
                    .is_some()
                {
                    return Err(violation(record, format!("{} registered twice", business)));
                }
            }
            LedgerEvent::PointsRedeemed {
                owner,
                business,
                amount,
            } => {
                if !self.businesses.contains_key(business) {
                    return Err(violation(record, format!("{} is not a business", business)));
                }
                let amount = RedeemAmount::new(*amount)
                    .map_err(|e| violation(record, e.to_string()))?;
                let balance = self.balances.entry(owner.clone()).or_default();
                *balance = balance
                    .debit(amount)
                    .map_err(|e| violation(record, e.to_string()))?;
            }
            LedgerEvent::RewardPaused { .. } => {
                if self.paused {
                    return Err(violation(record, "paused twice"));
                }
                self.paused = true;
            }
            LedgerEvent::RewardUnpaused { .. } => {
                if !self.paused {
                    return Err(violation(record, "unpaused while running"));
                }
                self.paused = false;
            }
            LedgerEvent::TierPolicyUpdated { .. } => {}
            LedgerEvent::Destroyed { .. } => {
                self.destroyed = true;
            }
        }
        Ok(())
    }

    /// Checks the projected balances against a stored balance table.
    pub fn verify_balances(&self, stored: &[(Identity, Points)]) -> Result<()> {
        let stored: BTreeMap<Identity, Points> = stored.iter().cloned().collect();
        if stored == self.balances {
            return Ok(());
        }

        let mismatch = self
            .balances
            .keys()
            .chain(stored.keys())
            .find(|owner| self.balances.get(*owner) != stored.get(*owner));
        Err(LedgerError::InvariantViolation(match mismatch {
            Some(owner) => format!(
                "balance of {} is {:?} in storage but {:?} by replay",
                owner,
                stored.get(owner).map(Points::value),
                self.balances.get(owner).map(Points::value),
            ),
            None => "balance tables differ".to_string(),
        }))
    }
}

fn violation(record: &EventRecord, reason: impl Into<String>) -> LedgerError {
    LedgerError::InvariantViolation(format!(
        "event #{} ({}): {}",
        record.sequence,
        record.event.name(),
        reason.into()
    ))
}
