use super::replay::LedgerProjection;
use crate::domain::access::SystemState;
use crate::domain::business::BusinessRecord;
use crate::domain::command::{Action, Command};
use crate::domain::event::{EventRecord, LedgerEvent};
use crate::domain::identity::Identity;
use crate::domain::points::{Points, RedeemAmount};
use crate::domain::ports::{LedgerStoreBox, StateChange};
use crate::domain::reward;
use crate::domain::vehicle::{EmissionLevel, Tier, TierPolicy, VehicleRecord};
use crate::error::{LedgerError, Result};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// The rewards ledger service.
///
/// `RewardLedger` owns the storage backend and a cached copy of the system
/// record. Every operation, reads included, holds the same lock for its
/// whole duration, so operations apply in a single global order and none
/// observes another half-done. All checks run before the one atomic
/// commit, so a failed operation changes nothing and emits no event.
pub struct RewardLedger {
    store: LedgerStoreBox,
    state: Mutex<SystemState>,
}

impl RewardLedger {
    /// Opens the ledger on top of `store`.
    ///
    /// An empty store is initialized with `administrator` and
    /// `tier_policy`. A store that already holds a system record keeps its
    /// persisted policy; its administrator must match `administrator`.
    ///
    /// # Arguments
    ///
    /// * `store` - The backing store for all ledger tables.
    /// * `administrator` - The privileged identity.
    /// * `tier_policy` - Emission level to tier mapping for a fresh ledger.
    pub async fn open(
        store: LedgerStoreBox,
        administrator: Identity,
        tier_policy: TierPolicy,
    ) -> Result<Self> {
        let state = match store.system_state().await? {
            Some(state) => {
                if state.administrator != administrator {
                    return Err(LedgerError::Config(format!(
                        "store is administered by {}, not {}",
                        state.administrator, administrator
                    )));
                }
                debug!(paused = state.paused, destroyed = state.destroyed, "Resumed ledger");
                state
            }
            None => {
                let state = SystemState::new(administrator, tier_policy);
                store.initialize(state.clone()).await?;
                info!(administrator = %state.administrator, "Initialized ledger");
                state
            }
        };

        Ok(Self {
            store,
            state: Mutex::new(state),
        })
    }

    /// Dispatches a command to the matching operation.
    pub async fn execute(&self, command: Command) -> Result<EventRecord> {
        let caller = &command.caller;
        match command.action {
            Action::RegisterVehicle {
                vehicle_id,
                make,
                model,
                emission_level,
            } => {
                self.register_vehicle(caller, vehicle_id, &make, &model, &emission_level)
                    .await
            }
            Action::ReportMileage { miles } => self.report_mileage(caller, miles).await,
            Action::RegisterBusiness { business, name } => {
                self.register_business(caller, &name, business).await
            }
            Action::RedeemPoints { business, amount } => {
                self.redeem_points(caller, &business, amount).await
            }
            Action::Pause => self.pause(caller).await,
            Action::Unpause => self.unpause(caller).await,
            Action::UpdateTier {
                emission_level,
                tier,
            } => self.update_tier(caller, &emission_level, tier).await,
            Action::Destroy => self.destroy(caller).await,
        }
    }

    /// Registers the caller's one vehicle and fixes its tier from the
    /// current policy.
    pub async fn register_vehicle(
        &self,
        caller: &Identity,
        vehicle_id: u64,
        make: &str,
        model: &str,
        emission_level: &str,
    ) -> Result<EventRecord> {
        let state = self.state.lock().await;
        state.require_writable()?;

        let emission_level: EmissionLevel = emission_level.parse()?;
        if self.store.vehicle(caller).await?.is_some() {
            return Err(LedgerError::AlreadyRegistered(caller.clone()));
        }

        let record = VehicleRecord {
            owner: caller.clone(),
            vehicle_id,
            make: make.to_string(),
            model: model.to_string(),
            emission_level,
            reward_tier: state.tier_policy.tier_for(emission_level),
        };
        let event = LedgerEvent::VehicleRegistered {
            owner: caller.clone(),
            vehicle_id,
            make: record.make.clone(),
            model: record.model.clone(),
            emission_level,
        };

        let tier = record.reward_tier;
        let committed = self.store.commit(StateChange::Vehicle(record), event).await?;
        info!(owner = %caller, vehicle_id, %emission_level, %tier, "Vehicle registered");
        Ok(committed)
    }

    /// Credits `miles * tier` points to the caller's balance.
    pub async fn report_mileage(&self, caller: &Identity, miles: u64) -> Result<EventRecord> {
        let state = self.state.lock().await;
        state.require_writable()?;

        let vehicle = self
            .store
            .vehicle(caller)
            .await?
            .ok_or_else(|| LedgerError::VehicleNotRegistered(caller.clone()))?;
        let earned = reward::points_for_mileage(miles, vehicle.reward_tier)?;
        let total = self.store.balance(caller).await?.credit(earned)?;

        let event = LedgerEvent::MileageReported {
            owner: caller.clone(),
            miles,
            total_points: total,
            make: vehicle.make,
            model: vehicle.model,
        };
        let change = StateChange::Balance {
            owner: caller.clone(),
            points: total,
        };

        let committed = self.store.commit(change, event).await?;
        info!(owner = %caller, miles, %earned, %total, "Mileage reported");
        Ok(committed)
    }

    /// Admits `business` as a redemption partner. Administrator only.
    pub async fn register_business(
        &self,
        caller: &Identity,
        name: &str,
        business: Identity,
    ) -> Result<EventRecord> {
        let state = self.state.lock().await;
        state.require_admin_action(caller)?;

        if self.store.business(&business).await?.is_some() {
            return Err(LedgerError::AlreadyRegistered(business));
        }

        let event = LedgerEvent::BusinessRegistered {
            business: business.clone(),
            name: name.to_string(),
        };
        let record = BusinessRecord::new(business.clone(), name);

        let committed = self.store.commit(StateChange::Business(record), event).await?;
        info!(%business, business_name = name, "Business registered");
        Ok(committed)
    }

    /// Burns `amount` points from the caller's balance at `business`.
    ///
    /// The business's own balance is not credited.
    pub async fn redeem_points(
        &self,
        caller: &Identity,
        business: &Identity,
        amount: u64,
    ) -> Result<EventRecord> {
        let state = self.state.lock().await;
        state.require_writable()?;

        let amount = RedeemAmount::new(amount)?;
        let registered = self
            .store
            .business(business)
            .await?
            .is_some_and(|record| record.is_registered);
        if !registered {
            return Err(LedgerError::BusinessNotRegistered(business.clone()));
        }

        let balance = self.store.balance(caller).await?;
        let remaining = reward::remaining_after_redemption(balance, amount)?;

        let event = LedgerEvent::PointsRedeemed {
            owner: caller.clone(),
            business: business.clone(),
            amount: amount.value(),
        };
        let change = StateChange::Balance {
            owner: caller.clone(),
            points: remaining,
        };

        let committed = self.store.commit(change, event).await?;
        info!(owner = %caller, %business, amount = amount.value(), %remaining, "Points redeemed");
        Ok(committed)
    }

    /// Stops user operations until `unpause`. Administrator only.
    pub async fn pause(&self, caller: &Identity) -> Result<EventRecord> {
        let mut state = self.state.lock().await;
        state.require_admin_action(caller)?;
        if state.paused {
            return Err(LedgerError::AlreadyPaused);
        }

        let mut next = state.clone();
        next.paused = true;
        let event = LedgerEvent::RewardPaused {
            administrator: caller.clone(),
        };

        let committed = self.store.commit(StateChange::System(next.clone()), event).await?;
        *state = next;
        info!("Reward system paused");
        Ok(committed)
    }

    /// Resumes user operations. Administrator only.
    pub async fn unpause(&self, caller: &Identity) -> Result<EventRecord> {
        let mut state = self.state.lock().await;
        state.require_admin_action(caller)?;
        if !state.paused {
            return Err(LedgerError::NotPaused);
        }

        let mut next = state.clone();
        next.paused = false;
        let event = LedgerEvent::RewardUnpaused {
            administrator: caller.clone(),
        };

        let committed = self.store.commit(StateChange::System(next.clone()), event).await?;
        *state = next;
        info!("Reward system unpaused");
        Ok(committed)
    }

    /// Changes the tier given to vehicles registered from now on.
    /// Existing vehicle records keep the tier they were registered with.
    pub async fn update_tier(
        &self,
        caller: &Identity,
        emission_level: &str,
        tier: u32,
    ) -> Result<EventRecord> {
        let mut state = self.state.lock().await;
        state.require_admin_action(caller)?;

        let emission_level: EmissionLevel = emission_level.parse()?;
        let tier = Tier::new(tier)?;

        let mut next = state.clone();
        next.tier_policy = next.tier_policy.with_tier(emission_level, tier);
        let event = LedgerEvent::TierPolicyUpdated {
            emission_level,
            tier,
        };

        let committed = self.store.commit(StateChange::System(next.clone()), event).await?;
        *state = next;
        info!(%emission_level, %tier, "Tier policy updated");
        Ok(committed)
    }

    /// Permanently halts the ledger. Every later operation fails with
    /// `SystemDestroyed`.
    pub async fn destroy(&self, caller: &Identity) -> Result<EventRecord> {
        let mut state = self.state.lock().await;
        state.require_admin_action(caller)?;

        let mut next = state.clone();
        next.destroyed = true;
        let event = LedgerEvent::Destroyed {
            administrator: caller.clone(),
        };

        let committed = self.store.commit(StateChange::System(next.clone()), event).await?;
        *state = next;
        info!("Reward system destroyed");
        Ok(committed)
    }

    /// The privileged identity fixed at initialization.
    pub async fn administrator(&self) -> Result<Identity> {
        let state = self.state.lock().await;
        state.require_live()?;
        Ok(state.administrator.clone())
    }

    /// Whether user operations are currently paused.
    pub async fn is_paused(&self) -> Result<bool> {
        let state = self.state.lock().await;
        state.require_live()?;
        Ok(state.paused)
    }

    /// The policy applied to new registrations.
    pub async fn tier_policy(&self) -> Result<TierPolicy> {
        let state = self.state.lock().await;
        state.require_live()?;
        Ok(state.tier_policy)
    }

    /// The vehicle registered by `owner`, if any.
    pub async fn vehicle(&self, owner: &Identity) -> Result<Option<VehicleRecord>> {
        let state = self.state.lock().await;
        state.require_live()?;
        self.store.vehicle(owner).await
    }

    /// The business record for `business`, if registered.
    pub async fn business(&self, business: &Identity) -> Result<Option<BusinessRecord>> {
        let state = self.state.lock().await;
        state.require_live()?;
        self.store.business(business).await
    }

    /// Current balance of `owner`; zero for identities never credited.
    pub async fn balance_of(&self, owner: &Identity) -> Result<Points> {
        let state = self.state.lock().await;
        state.require_live()?;
        self.store.balance(owner).await
    }

    /// All balance entries, sorted by owner.
    pub async fn balances(&self) -> Result<Vec<(Identity, Points)>> {
        let state = self.state.lock().await;
        state.require_live()?;
        let mut balances = self.store.balances().await?;
        balances.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(balances)
    }

    /// The full event log in sequence order.
    ///
    /// Unlike every other read this stays available after destruction, so
    /// the audit trail of a decommissioned ledger can still be exported.
    pub async fn events(&self) -> Result<Vec<EventRecord>> {
        let _state = self.state.lock().await;
        self.store.events().await
    }

    /// Replays the event log and checks it against the stored balances.
    ///
    /// Mileage credits are priced with the tier on each owner's stored
    /// vehicle record, so an altered total fails the audit even when the
    /// balance table was altered to match.
    pub async fn audit(&self) -> Result<LedgerProjection> {
        let _state = self.state.lock().await;
        let events = self.store.events().await?;

        let mut tiers = BTreeMap::new();
        for record in &events {
            if let LedgerEvent::VehicleRegistered { owner, .. } = &record.event {
                if let Some(vehicle) = self.store.vehicle(owner).await? {
                    tiers.insert(owner.clone(), vehicle.reward_tier);
                }
            }
        }

        let projection = LedgerProjection::replay(&events, &tiers)?;
        projection.verify_balances(&self.store.balances().await?)?;
        debug!(owners = projection.balances.len(), "Event log replay matches balances");
        Ok(projection)
    }

    /// Consumes the ledger and returns the final balances, sorted by owner.
    ///
    /// This is a teardown snapshot rather than a ledger read, so it works on
    /// a destroyed ledger too.
    pub async fn into_balances(self) -> Result<Vec<(Identity, Points)>> {
        let mut balances = self.store.balances().await?;
        balances.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(balances)
    }
}
