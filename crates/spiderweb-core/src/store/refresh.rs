// ── Refresh application logic ──
//
// Applies fetched entity batches into the DataStore. Full-stage results
// use upsert-then-prune; scoped results (a single network's sites after a
// mutation) prune only within their parent's slice of the collection.

use std::collections::HashSet;

use chrono::Utc;

use super::DataStore;
use super::collection::EntityCollection;
use crate::model::{Alert, CoreDevice, CoreSite, EndSite, EntityId, Link, Network};

/// Upsert all incoming entities, then prune any existing ids not in the
/// incoming set. This avoids the brief empty state that `clear()` causes.
fn upsert_and_prune<T: Clone + Send + Sync + 'static>(
    collection: &EntityCollection<T>,
    items: Vec<(EntityId, T)>,
) {
    let incoming: HashSet<EntityId> = items.iter().map(|(id, _)| id.clone()).collect();
    collection.upsert_many(items);
    for existing in collection.ids() {
        if !incoming.contains(&existing) {
            collection.remove(&existing);
        }
    }
}

impl DataStore {
    pub(crate) fn set_networks(&self, networks: Vec<Network>) {
        upsert_and_prune(
            &self.networks,
            networks.into_iter().map(|n| (n.id.clone(), n)).collect(),
        );
    }

    pub(crate) fn set_core_sites(&self, sites: Vec<CoreSite>) {
        upsert_and_prune(
            &self.core_sites,
            sites.into_iter().map(|s| (s.id.clone(), s)).collect(),
        );
    }

    pub(crate) fn set_core_devices(&self, devices: Vec<CoreDevice>) {
        upsert_and_prune(
            &self.core_devices,
            devices.into_iter().map(|d| (d.id.clone(), d)).collect(),
        );
    }

    pub(crate) fn set_links(&self, links: Vec<Link>) {
        upsert_and_prune(
            &self.links,
            links.into_iter().map(|l| (l.id.clone(), l)).collect(),
        );
    }

    pub(crate) fn set_end_sites(&self, end_sites: Vec<EndSite>) {
        upsert_and_prune(
            &self.end_sites,
            end_sites.into_iter().map(|e| (e.id.clone(), e)).collect(),
        );
    }

    /// Replace the alert set, preserving locally pinned favorites: the
    /// favorite flag is store-local state the backend knows nothing about,
    /// so a poll refresh must not clear it.
    pub(crate) fn set_alerts(&self, alerts: Vec<Alert>) {
        let merged: Vec<(EntityId, Alert)> = alerts
            .into_iter()
            .map(|mut a| {
                if let Some(existing) = self.alerts.get(&a.id) {
                    a.is_favorite = a.is_favorite || existing.is_favorite;
                }
                (a.id.clone(), a)
            })
            .collect();
        upsert_and_prune(&self.alerts, merged);
    }

    /// Replace the core sites of one network only (post-mutation refetch).
    pub(crate) fn set_core_sites_for_network(&self, network_id: &EntityId, sites: Vec<CoreSite>) {
        let incoming: HashSet<EntityId> = sites.iter().map(|s| s.id.clone()).collect();
        let stale: Vec<EntityId> = self
            .core_sites
            .snapshot()
            .iter()
            .filter(|s| &s.network_id == network_id && !incoming.contains(&s.id))
            .map(|s| s.id.clone())
            .collect();

        self.core_sites
            .upsert_many(sites.into_iter().map(|s| (s.id.clone(), s)));
        for id in stale {
            self.core_sites.remove(&id);
        }
    }

    /// Replace the core devices of one site only (post-mutation refetch).
    pub(crate) fn set_core_devices_for_site(&self, site_id: &EntityId, devices: Vec<CoreDevice>) {
        let incoming: HashSet<EntityId> = devices.iter().map(|d| d.id.clone()).collect();
        let stale: Vec<EntityId> = self
            .core_devices
            .snapshot()
            .iter()
            .filter(|d| &d.core_site_id == site_id && !incoming.contains(&d.id))
            .map(|d| d.id.clone())
            .collect();

        self.core_devices
            .upsert_many(devices.into_iter().map(|d| (d.id.clone(), d)));
        for id in stale {
            self.core_devices.remove(&id);
        }
    }

    /// Stamp a completed full refresh.
    pub(crate) fn mark_refreshed(&self) {
        let _ = self.last_refresh.send(Some(Utc::now()));
    }
}
