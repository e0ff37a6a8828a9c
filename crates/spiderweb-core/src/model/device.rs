// ── Core-device domain type ──

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A core network device (router/switch) belonging to a CoreSite.
///
/// `core_site_id` is tagged client-side from fetch context, the same way
/// sites carry their network id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreDevice {
    pub id: EntityId,
    pub name: String,
    /// Management address. The backend sometimes reports junk here, so
    /// anything unparseable is dropped rather than carried as a string.
    pub ip_address: Option<IpAddr>,
    pub core_site_id: EntityId,
}
