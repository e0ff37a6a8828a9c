//! Shared lookup helpers for command handlers.

use std::sync::Arc;

use spiderweb_core::{CoreDevice, CoreSite, DataStore, EntityId, Network};

use crate::error::CliError;

/// Resolve a network by id or (case-insensitive) name.
pub fn resolve_network(store: &DataStore, needle: &str) -> Result<Arc<Network>, CliError> {
    let id: EntityId = needle.into();
    store
        .networks_snapshot()
        .iter()
        .find(|n| n.id == id || n.name.eq_ignore_ascii_case(needle))
        .map(Arc::clone)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "network".into(),
            identifier: needle.to_owned(),
            list_command: "networks list".into(),
        })
}

/// Resolve a core site by id or (case-insensitive) name.
pub fn resolve_site(store: &DataStore, needle: &str) -> Result<Arc<CoreSite>, CliError> {
    let id: EntityId = needle.into();
    store
        .core_sites_snapshot()
        .iter()
        .find(|s| s.id == id || s.name.eq_ignore_ascii_case(needle))
        .map(Arc::clone)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "core site".into(),
            identifier: needle.to_owned(),
            list_command: "sites list".into(),
        })
}

/// Resolve a core device by id or (case-insensitive) name.
pub fn resolve_device(store: &DataStore, needle: &str) -> Result<Arc<CoreDevice>, CliError> {
    let id: EntityId = needle.into();
    store
        .core_devices_snapshot()
        .iter()
        .find(|d| d.id == id || d.name.eq_ignore_ascii_case(needle))
        .map(Arc::clone)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "core device".into(),
            identifier: needle.to_owned(),
            list_command: "devices list".into(),
        })
}

/// Display label for a link endpoint: device name, end-site name, or the
/// bare id when neither resolves.
pub fn endpoint_label(store: &DataStore, id: &EntityId) -> String {
    if let Some(device) = store.core_device_by_id(id) {
        return device.name.clone();
    }
    if let Some(end_site) = store.end_site_by_id(id) {
        return end_site.site_name_english.clone();
    }
    id.to_string()
}
