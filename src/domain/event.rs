use super::identity::Identity;
use super::points::Points;
use super::vehicle::{EmissionLevel, Tier};
use serde::{Deserialize, Serialize};

/// Domain events, one per successful mutating operation.
///
/// Field order within each variant is part of the audit log format and
/// must not change.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    VehicleRegistered {
        owner: Identity,
        vehicle_id: u64,
        make: String,
        model: String,
        emission_level: EmissionLevel,
    },
    /// `total_points` is the owner's balance after the credit. Make and
    /// model are repeated so log readers need no second lookup.
    MileageReported {
        owner: Identity,
        miles: u64,
        total_points: Points,
        make: String,
        model: String,
    },
    BusinessRegistered {
        business: Identity,
        name: String,
    },
    PointsRedeemed {
        owner: Identity,
        business: Identity,
        amount: u64,
    },
    RewardPaused {
        administrator: Identity,
    },
    RewardUnpaused {
        administrator: Identity,
    },
    TierPolicyUpdated {
        emission_level: EmissionLevel,
        tier: Tier,
    },
    Destroyed {
        administrator: Identity,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::VehicleRegistered { .. } => "VehicleRegistered",
            LedgerEvent::MileageReported { .. } => "MileageReported",
            LedgerEvent::BusinessRegistered { .. } => "BusinessRegistered",
            LedgerEvent::PointsRedeemed { .. } => "PointsRedeemed",
            LedgerEvent::RewardPaused { .. } => "RewardPaused",
            LedgerEvent::RewardUnpaused { .. } => "RewardUnpaused",
            LedgerEvent::TierPolicyUpdated { .. } => "TierPolicyUpdated",
            LedgerEvent::Destroyed { .. } => "Destroyed",
        }
    }

    /// Events produced by pause-gated user operations.
    pub fn is_user_action(&self) -> bool {
        matches!(
            self,
            LedgerEvent::VehicleRegistered { .. }
                | LedgerEvent::MileageReported { .. }
                | LedgerEvent::PointsRedeemed { .. }
        )
    }
}

/// An event as stored in the append-only log.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct EventRecord {
    /// Position in the log, starting at 1.
    pub sequence: u64,
    #[serde(flatten)]
    pub event: LedgerEvent,
}
