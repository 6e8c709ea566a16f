use super::identity::Identity;

/// A single ledger operation requested by an authenticated caller.
#[derive(Debug, PartialEq, Clone)]
pub struct Command {
    pub caller: Identity,
    pub action: Action,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Action {
    RegisterVehicle {
        vehicle_id: u64,
        make: String,
        model: String,
        /// Raw text; validated by the vehicle registry.
        emission_level: String,
    },
    ReportMileage {
        miles: u64,
    },
    RegisterBusiness {
        business: Identity,
        name: String,
    },
    RedeemPoints {
        business: Identity,
        amount: u64,
    },
    Pause,
    Unpause,
    UpdateTier {
        emission_level: String,
        tier: u32,
    },
    Destroy,
}

impl Command {
    pub fn new(caller: Identity, action: Action) -> Self {
        Self { caller, action }
    }
}
