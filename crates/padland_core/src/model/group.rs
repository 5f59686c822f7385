//! Pad group domain model.
//!
//! # Invariants
//! - Genuine groups have ids greater than `UNCLASSIFIED_GROUP_ID`.
//! - The unclassified bucket is synthetic; it has no row in storage.

use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the group store.
pub type GroupId = i64;

/// Reserved id meaning "no group". Never user-deletable.
pub const UNCLASSIFIED_GROUP_ID: GroupId = 0;

/// Returns whether `id` names a stored, user-managed group.
pub fn is_genuine_group(id: GroupId) -> bool {
    id > UNCLASSIFIED_GROUP_ID
}

/// User-defined named bucket of pads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadGroup {
    pub id: GroupId,
    pub name: String,
    /// Stable display order key.
    pub position: i64,
}
