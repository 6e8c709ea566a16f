use crate::domain::access::SystemState;
use crate::domain::business::BusinessRecord;
use crate::domain::event::{EventRecord, LedgerEvent};
use crate::domain::identity::Identity;
use crate::domain::points::Points;
use crate::domain::ports::{LedgerStore, StateChange};
use crate::domain::vehicle::VehicleRecord;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    system: Option<SystemState>,
    vehicles: HashMap<Identity, VehicleRecord>,
    businesses: HashMap<Identity, BusinessRecord>,
    balances: HashMap<Identity, Points>,
    events: Vec<EventRecord>,
}

/// A thread-safe in-memory ledger store.
///
/// All tables sit behind one `RwLock`, so a commit is atomic with respect
/// to every reader. Ideal for testing or one-shot batch runs where
/// persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn initialize(&self, state: SystemState) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.system = Some(state);
        Ok(())
    }

    async fn commit(&self, change: StateChange, event: LedgerEvent) -> Result<EventRecord> {
        let mut tables = self.tables.write().await;
        match change {
            StateChange::Vehicle(record) => {
                tables.vehicles.insert(record.owner.clone(), record);
            }
            StateChange::Business(record) => {
                tables.businesses.insert(record.business.clone(), record);
            }
            StateChange::Balance { owner, points } => {
                tables.balances.insert(owner, points);
            }
            StateChange::System(state) => {
                tables.system = Some(state);
            }
        }

        let record = EventRecord {
            sequence: tables.events.len() as u64 + 1,
            event,
        };
        tables.events.push(record.clone());
        Ok(record)
    }

    async fn system_state(&self) -> Result<Option<SystemState>> {
        let tables = self.tables.read().await;
        Ok(tables.system.clone())
    }

    async fn vehicle(&self, owner: &Identity) -> Result<Option<VehicleRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.vehicles.get(owner).cloned())
    }

    async fn business(&self, business: &Identity) -> Result<Option<BusinessRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.businesses.get(business).cloned())
    }

    async fn balance(&self, owner: &Identity) -> Result<Points> {
        let tables = self.tables.read().await;
        Ok(tables.balances.get(owner).copied().unwrap_or_default())
    }

    async fn balances(&self) -> Result<Vec<(Identity, Points)>> {
        let tables = self.tables.read().await;
        Ok(tables
            .balances
            .iter()
            .map(|(owner, points)| (owner.clone(), *points))
            .collect())
    }

    async fn events(&self) -> Result<Vec<EventRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.events.clone())
    }
}
