use super::access::SystemState;
use super::business::BusinessRecord;
use super::event::{EventRecord, LedgerEvent};
use super::identity::Identity;
use super::points::Points;
use super::vehicle::VehicleRecord;
use crate::error::Result;
use async_trait::async_trait;

/// The single state mutation carried by a successful ledger operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    Vehicle(VehicleRecord),
    Business(BusinessRecord),
    Balance { owner: Identity, points: Points },
    System(SystemState),
}

/// Backing store for every ledger table and the event log.
///
/// `commit` must apply the state change and append the event as one
/// atomic unit: either both become visible or neither does.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Writes the initial system record. Only called on an empty store.
    async fn initialize(&self, state: SystemState) -> Result<()>;
    async fn commit(&self, change: StateChange, event: LedgerEvent) -> Result<EventRecord>;

    async fn system_state(&self) -> Result<Option<SystemState>>;
    async fn vehicle(&self, owner: &Identity) -> Result<Option<VehicleRecord>>;
    async fn business(&self, business: &Identity) -> Result<Option<BusinessRecord>>;
    async fn balance(&self, owner: &Identity) -> Result<Points>;
    async fn balances(&self) -> Result<Vec<(Identity, Points)>>;
    async fn events(&self) -> Result<Vec<EventRecord>>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
