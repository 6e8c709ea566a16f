use crate::domain::access::SystemState;
use crate::domain::business::BusinessRecord;
use crate::domain::event::{EventRecord, LedgerEvent};
use crate::domain::identity::Identity;
use crate::domain::points::Points;
use crate::domain::ports::{LedgerStore, StateChange};
use crate::domain::vehicle::VehicleRecord;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for the singleton system record.
pub const CF_SYSTEM: &str = "system";
/// Column Family for vehicle records, keyed by owner.
pub const CF_VEHICLES: &str = "vehicles";
/// Column Family for business records, keyed by business identity.
pub const CF_BUSINESSES: &str = "businesses";
/// Column Family for point balances, keyed by owner.
pub const CF_BALANCES: &str = "balances";
/// Column Family for the event log, keyed by big-endian sequence number.
pub const CF_EVENTS: &str = "events";

const SYSTEM_KEY: &[u8] = b"state";

/// A persistent ledger store using RocksDB.
///
/// Each table lives in its own Column Family. A commit writes the state
/// change and the event in a single `WriteBatch`, so a crash can never
/// leave one without the other.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
    next_sequence: Arc<Mutex<u64>>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures every ledger column family exists and resumes the event
    /// sequence after the last stored event.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_SYSTEM, CF_VEHICLES, CF_BUSINESSES, CF_BALANCES, CF_EVENTS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        let last_sequence = {
            let cf = db.cf_handle(CF_EVENTS).ok_or_else(|| missing_cf(CF_EVENTS))?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _) = item?;
                    decode_sequence(&key)?
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            next_sequence: Arc::new(Mutex::new(last_sequence + 1)),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| missing_cf(name))
    }

    fn read<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn read_all<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<(Box<[u8]>, T)>> {
        let cf = self.cf(cf_name)?;
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item?;
            rows.push((key, serde_json::from_slice(&value)?));
        }
        Ok(rows)
    }
}

fn missing_cf(name: &str) -> LedgerError {
    LedgerError::Storage(format!("{} column family not found", name))
}

fn decode_sequence(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key
        .try_into()
        .map_err(|_| LedgerError::Storage(format!("corrupt event key of {} bytes", key.len())))?;
    Ok(u64::from_be_bytes(bytes))
}

fn decode_identity(key: &[u8]) -> Result<Identity> {
    let text = std::str::from_utf8(key)
        .map_err(|e| LedgerError::Storage(format!("corrupt identity key: {}", e)))?;
    Identity::new(text)
}

#[async_trait]
impl LedgerStore for RocksDbStore {
    async fn initialize(&self, state: SystemState) -> Result<()> {
        let cf = self.cf(CF_SYSTEM)?;
        self.db.put_cf(cf, SYSTEM_KEY, serde_json::to_vec(&state)?)?;
        Ok(())
    }

    async fn commit(&self, change: StateChange, event: LedgerEvent) -> Result<EventRecord> {
        let mut next_sequence = self.next_sequence.lock().await;
        let record = EventRecord {
            sequence: *next_sequence,
            event,
        };

        let mut batch = WriteBatch::default();
        match &change {
            StateChange::Vehicle(vehicle) => {
                batch.put_cf(
                    self.cf(CF_VEHICLES)?,
                    &vehicle.owner,
                    serde_json::to_vec(vehicle)?,
                );
            }
            StateChange::Business(business) => {
                batch.put_cf(
                    self.cf(CF_BUSINESSES)?,
                    &business.business,
                    serde_json::to_vec(business)?,
                );
            }
            StateChange::Balance { owner, points } => {
                batch.put_cf(self.cf(CF_BALANCES)?, owner, serde_json::to_vec(points)?);
            }
            StateChange::System(state) => {
                batch.put_cf(self.cf(CF_SYSTEM)?, SYSTEM_KEY, serde_json::to_vec(state)?);
            }
        }
        batch.put_cf(
            self.cf(CF_EVENTS)?,
            record.sequence.to_be_bytes(),
            serde_json::to_vec(&record)?,
        );

        self.db.write(batch)?;
        *next_sequence += 1;
        Ok(record)
    }

    async fn system_state(&self) -> Result<Option<SystemState>> {
        self.read(CF_SYSTEM, SYSTEM_KEY)
    }

    async fn vehicle(&self, owner: &Identity) -> Result<Option<VehicleRecord>> {
        self.read(CF_VEHICLES, owner.as_ref())
    }

    async fn business(&self, business: &Identity) -> Result<Option<BusinessRecord>> {
        self.read(CF_BUSINESSES, business.as_ref())
    }

    async fn balance(&self, owner: &Identity) -> Result<Points> {
        Ok(self
            .read(CF_BALANCES, owner.as_ref())?
            .unwrap_or_default())
    }

    async fn balances(&self) -> Result<Vec<(Identity, Points)>> {
        self.read_all::<Points>(CF_BALANCES)?
            .into_iter()
            .map(|(key, points)| -> Result<(Identity, Points)> {
                Ok((decode_identity(&key)?, points))
            })
            .collect()
    }

    async fn events(&self) -> Result<Vec<EventRecord>> {
        // Big-endian keys iterate in sequence order.
        Ok(self
            .read_all::<EventRecord>(CF_EVENTS)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }
}
