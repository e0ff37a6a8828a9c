// ── Site domain types ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A physical/logical site hosting core network devices, grouped under a
/// Network. The `network_id` is tagged client-side from fetch context --
/// the backend's site payload does not include it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreSite {
    pub id: EntityId,
    pub name: String,
    pub network_id: EntityId,
}

/// A downstream customer/branch location connected to a core device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndSite {
    pub id: EntityId,
    /// The core device this end-site hangs off.
    pub device_id: EntityId,
    pub site_name_english: String,
    pub site_name_hebrew: String,
    /// Uplink interface on the core device (e.g. `ge-0/0/1`).
    pub interface_id: Option<String>,
}
