use super::identity::Identity;
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EmissionLevel {
    Electric,
    Hybrid,
    Gas,
}

impl EmissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmissionLevel::Electric => "electric",
            EmissionLevel::Hybrid => "hybrid",
            EmissionLevel::Gas => "gas",
        }
    }
}

impl FromStr for EmissionLevel {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electric" => Ok(EmissionLevel::Electric),
            "hybrid" => Ok(EmissionLevel::Hybrid),
            "gas" => Ok(EmissionLevel::Gas),
            _ => Err(LedgerError::InvalidEmissionLevel(s.to_string())),
        }
    }
}

impl fmt::Display for EmissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multiplier applied to reported mileage. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Tier(u32);

impl Tier {
    pub fn new(value: u32) -> Result<Self, LedgerError> {
        if value >= 1 {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidTier(value))
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Tier {
    type Error = LedgerError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tier> for u32 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Emission level to tier lookup used when a vehicle is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPolicy {
    pub electric: Tier,
    pub hybrid: Tier,
    pub gas: Tier,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            electric: Tier(8),
            hybrid: Tier(4),
            gas: Tier(1),
        }
    }
}

impl TierPolicy {
    pub fn tier_for(&self, level: EmissionLevel) -> Tier {
        match level {
            EmissionLevel::Electric => self.electric,
            EmissionLevel::Hybrid => self.hybrid,
            EmissionLevel::Gas => self.gas,
        }
    }

    /// Returns a copy of the policy with `level` mapped to `tier`.
    pub fn with_tier(mut self, level: EmissionLevel, tier: Tier) -> Self {
        match level {
            EmissionLevel::Electric => self.electric = tier,
            EmissionLevel::Hybrid => self.hybrid = tier,
            EmissionLevel::Gas => self.gas = tier,
        }
        self
    }
}

/// A registered vehicle, keyed by its owner.
///
/// The tier is captured at registration time and is not affected by later
/// policy updates.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct VehicleRecord {
    pub owner: Identity,
    pub vehicle_id: u64,
    pub make: String,
    pub model: String,
    pub emission_level: EmissionLevel,
    pub reward_tier: Tier,
}
