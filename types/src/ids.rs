//! Stable identifiers for elements tracked across series.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, process-lifetime identifier for a single element (event, interval,
/// point, line, or mask) within a series. `0` is reserved for "unassigned".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The reserved "unassigned" sentinel.
    pub const UNASSIGNED: EntityId = EntityId(0);

    #[must_use]
    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        EntityId(value)
    }
}
