//! Runtime configuration for the `eco-ledger` binary.

use crate::domain::identity::Identity;
use crate::domain::vehicle::TierPolicy;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ledger configuration, loaded from an optional JSON file.
/// Command line flags override individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Administrator identity for a fresh ledger.
    pub administrator: Option<Identity>,

    /// RocksDB directory. In-memory storage when absent.
    pub db_path: Option<PathBuf>,

    /// Tier policy for a fresh ledger. A persisted ledger keeps its own.
    pub tier_policy: TierPolicy,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            administrator: None,
            db_path: None,
            tier_policy: TierPolicy::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&text).map_err(|e| {
            LedgerError::Config(format!("{}: {}", path.as_ref().display(), e))
        })
    }

    pub fn require_administrator(&self) -> Result<Identity> {
        self.administrator.clone().ok_or_else(|| {
            LedgerError::Config(
                "no administrator configured; pass --admin or set it in the config file"
                    .to_string(),
            )
        })
    }
}
