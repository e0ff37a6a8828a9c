// ── Network domain type ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Top-level grouping and root of the fetch dependency chain. A deployment
/// typically has a handful of these (the "L" and "P" chart networks are two
/// of them), each owning a set of core sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub id: EntityId,
    pub name: String,
}
