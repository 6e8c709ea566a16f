use super::identity::Identity;
use serde::{Deserialize, Serialize};

/// A business allowed to receive point redemptions.
///
/// Records are only ever created registered; there is no way to
/// unregister one.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct BusinessRecord {
    pub business: Identity,
    pub name: String,
    pub is_registered: bool,
}

impl BusinessRecord {
    pub fn new(business: Identity, name: impl Into<String>) -> Self {
        Self {
            business,
            name: name.into(),
            is_registered: true,
        }
    }
}
