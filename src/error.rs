use crate::domain::identity::Identity;
use crate::domain::points::Points;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Only owner can call this function")]
    Unauthorized,
    #[error("Reward system is paused")]
    SystemPaused,
    #[error("Reward system is not paused")]
    NotPaused,
    #[error("Reward system is already paused")]
    AlreadyPaused,
    #[error("Reward system has been destroyed")]
    SystemDestroyed,
    #[error("No vehicle registered for {0}")]
    VehicleNotRegistered(Identity),
    #[error("Business {0} is not registered")]
    BusinessNotRegistered(Identity),
    #[error("{0} is already registered")]
    AlreadyRegistered(Identity),
    #[error("Insufficient points: have {available}, need {requested}")]
    InsufficientPoints { available: Points, requested: u64 },
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Invalid emission level: {0:?}")]
    InvalidEmissionLevel(String),
    #[error("Invalid reward tier: {0}")]
    InvalidTier(u32),
    #[error("Points arithmetic overflow")]
    Overflow,
    #[error("Malformed command: {0}")]
    MalformedCommand(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
