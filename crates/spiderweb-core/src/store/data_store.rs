// ── Central reactive data store ──
//
// Thread-safe, lock-free storage for all Spiderweb domain entities.
// Mutations are broadcast to subscribers via `watch` channels. Only the
// orchestrator and the command processor write here; views subscribe.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use super::status::{CollectionStatus, StatusCell};
use crate::model::{Alert, CoreDevice, CoreSite, EndSite, EntityId, Link, LinkStatus, Network};
use crate::stream::EntityStream;

/// Central reactive store: one collection per entity type, each paired
/// with an observable load status.
pub struct DataStore {
    pub(crate) networks: EntityCollection<Network>,
    pub(crate) core_sites: EntityCollection<CoreSite>,
    pub(crate) core_devices: EntityCollection<CoreDevice>,
    pub(crate) links: EntityCollection<Link>,
    pub(crate) end_sites: EntityCollection<EndSite>,
    pub(crate) alerts: EntityCollection<Alert>,

    pub(crate) networks_status: StatusCell,
    pub(crate) core_sites_status: StatusCell,
    pub(crate) core_devices_status: StatusCell,
    pub(crate) links_status: StatusCell,
    pub(crate) end_sites_status: StatusCell,
    pub(crate) alerts_status: StatusCell,

    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);

        Self {
            networks: EntityCollection::new(),
            core_sites: EntityCollection::new(),
            core_devices: EntityCollection::new(),
            links: EntityCollection::new(),
            end_sites: EntityCollection::new(),
            alerts: EntityCollection::new(),
            networks_status: StatusCell::new(),
            core_sites_status: StatusCell::new(),
            core_devices_status: StatusCell::new(),
            links_status: StatusCell::new(),
            end_sites_status: StatusCell::new(),
            alerts_status: StatusCell::new(),
            last_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn networks_snapshot(&self) -> Arc<Vec<Arc<Network>>> {
        self.networks.snapshot()
    }

    pub fn core_sites_snapshot(&self) -> Arc<Vec<Arc<CoreSite>>> {
        self.core_sites.snapshot()
    }

    pub fn core_devices_snapshot(&self) -> Arc<Vec<Arc<CoreDevice>>> {
        self.core_devices.snapshot()
    }

    pub fn links_snapshot(&self) -> Arc<Vec<Arc<Link>>> {
        self.links.snapshot()
    }

    pub fn end_sites_snapshot(&self) -> Arc<Vec<Arc<EndSite>>> {
        self.end_sites.snapshot()
    }

    pub fn alerts_snapshot(&self) -> Arc<Vec<Arc<Alert>>> {
        self.alerts.snapshot()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn network_by_id(&self, id: &EntityId) -> Option<Arc<Network>> {
        self.networks.get(id)
    }

    pub fn core_site_by_id(&self, id: &EntityId) -> Option<Arc<CoreSite>> {
        self.core_sites.get(id)
    }

    pub fn core_device_by_id(&self, id: &EntityId) -> Option<Arc<CoreDevice>> {
        self.core_devices.get(id)
    }

    pub fn end_site_by_id(&self, id: &EntityId) -> Option<Arc<EndSite>> {
        self.end_sites.get(id)
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    pub fn core_site_count(&self) -> usize {
        self.core_sites.len()
    }

    pub fn core_device_count(&self) -> usize {
        self.core_devices.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn end_site_count(&self) -> usize {
        self.end_sites.len()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    // ── Status accessors ─────────────────────────────────────────────

    pub fn networks_status(&self) -> CollectionStatus {
        self.networks_status.get()
    }

    pub fn core_sites_status(&self) -> CollectionStatus {
        self.core_sites_status.get()
    }

    pub fn core_devices_status(&self) -> CollectionStatus {
        self.core_devices_status.get()
    }

    pub fn links_status(&self) -> CollectionStatus {
        self.links_status.get()
    }

    pub fn end_sites_status(&self) -> CollectionStatus {
        self.end_sites_status.get()
    }

    pub fn alerts_status(&self) -> CollectionStatus {
        self.alerts_status.get()
    }

    /// Whether the initial load has settled: stage 1 finished and nothing
    /// is still in flight. Collections halted by an upstream failure stay
    /// `Idle` and count as settled.
    pub fn initial_load_settled(&self) -> bool {
        self.networks_status().is_settled()
            && ![
                self.core_sites_status(),
                self.core_devices_status(),
                self.links_status(),
                self.end_sites_status(),
            ]
            .iter()
            .any(|s| matches!(s, CollectionStatus::Loading))
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_networks(&self) -> EntityStream<Network> {
        EntityStream::new(self.networks.subscribe())
    }

    pub fn subscribe_core_sites(&self) -> EntityStream<CoreSite> {
        EntityStream::new(self.core_sites.subscribe())
    }

    pub fn subscribe_core_devices(&self) -> EntityStream<CoreDevice> {
        EntityStream::new(self.core_devices.subscribe())
    }

    pub fn subscribe_links(&self) -> EntityStream<Link> {
        EntityStream::new(self.links.subscribe())
    }

    pub fn subscribe_end_sites(&self) -> EntityStream<EndSite> {
        EntityStream::new(self.end_sites.subscribe())
    }

    pub fn subscribe_alerts(&self) -> EntityStream<Alert> {
        EntityStream::new(self.alerts.subscribe())
    }

    pub fn subscribe_networks_status(&self) -> watch::Receiver<CollectionStatus> {
        self.networks_status.subscribe()
    }

    pub fn subscribe_core_sites_status(&self) -> watch::Receiver<CollectionStatus> {
        self.core_sites_status.subscribe()
    }

    pub fn subscribe_core_devices_status(&self) -> watch::Receiver<CollectionStatus> {
        self.core_devices_status.subscribe()
    }

    pub fn subscribe_links_status(&self) -> watch::Receiver<CollectionStatus> {
        self.links_status.subscribe()
    }

    pub fn subscribe_end_sites_status(&self) -> watch::Receiver<CollectionStatus> {
        self.end_sites_status.subscribe()
    }

    pub fn subscribe_alerts_status(&self) -> watch::Receiver<CollectionStatus> {
        self.alerts_status.subscribe()
    }

    // ── Store-local mutations ────────────────────────────────────────

    /// Flip the favorite flag on one alert. Returns the new state, or
    /// `None` if the id is unknown. All other entries are untouched.
    pub fn toggle_alert_favorite(&self, id: &EntityId) -> Option<bool> {
        let current = self.alerts.get(id)?;
        let mut updated = (*current).clone();
        updated.is_favorite = !updated.is_favorite;
        let new_state = updated.is_favorite;
        self.alerts.upsert(id.clone(), updated);
        Some(new_state)
    }

    /// Apply a realtime status transition to one link. Returns `false` if
    /// the link is not (or no longer) in the store -- superseded updates
    /// are simply ignored.
    pub fn update_link_status(&self, id: &EntityId, status: LinkStatus) -> bool {
        let Some(current) = self.links.get(id) else {
            return false;
        };
        let mut updated = (*current).clone();
        updated.status = status;
        self.links.upsert(id.clone(), updated);
        true
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// The global logout reset: every collection back to empty, every
    /// status back to idle. A subsequent connect starts from scratch.
    pub fn reset(&self) {
        self.networks.clear();
        self.core_sites.clear();
        self.core_devices.clear();
        self.links.clear();
        self.end_sites.clear();
        self.alerts.clear();

        self.networks_status.reset();
        self.core_sites_status.reset();
        self.core_devices_status.reset();
        self.links_status.reset();
        self.end_sites_status.reset();
        self.alerts_status.reset();

        let _ = self.last_refresh.send(None);
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last full refresh occurred, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::model::AlertSeverity;

    fn alert(id: &str, favorite: bool) -> Alert {
        Alert {
            id: EntityId::from(id),
            severity: AlertSeverity::Warning,
            message: "test".into(),
            timestamp: Utc::now(),
            is_favorite: favorite,
            source: None,
            network_line: None,
            severity_score: None,
            details: None,
        }
    }

    #[test]
    fn toggle_favorite_flips_only_the_requested_alert() {
        let store = DataStore::new();
        store
            .alerts
            .upsert(EntityId::from("link-10g-abc"), alert("link-10g-abc", false));
        store
            .alerts
            .upsert(EntityId::from("alert-2"), alert("alert-2", false));

        let flipped = store.toggle_alert_favorite(&EntityId::from("link-10g-abc"));
        assert_eq!(flipped, Some(true));

        let snap = store.alerts_snapshot();
        for a in snap.iter() {
            let expected = a.id == EntityId::from("link-10g-abc");
            assert_eq!(a.is_favorite, expected, "wrong flag on {}", a.id);
        }

        // Toggling again flips back.
        let flipped = store.toggle_alert_favorite(&EntityId::from("link-10g-abc"));
        assert_eq!(flipped, Some(false));
    }

    #[test]
    fn toggle_favorite_on_unknown_id_is_none() {
        let store = DataStore::new();
        assert_eq!(store.toggle_alert_favorite(&EntityId::from("nope")), None);
    }

    #[test]
    fn update_link_status_ignores_unknown_links() {
        let store = DataStore::new();
        assert!(!store.update_link_status(&EntityId::from("l-1"), LinkStatus::Down));
    }

    #[test]
    fn reset_clears_collections_and_statuses() {
        let store = DataStore::new();
        store.alerts.upsert(EntityId::from("a-1"), alert("a-1", true));
        store.alerts_status.set(CollectionStatus::Succeeded);
        let _ = store.last_refresh.send(Some(Utc::now()));

        store.reset();

        assert_eq!(store.alert_count(), 0);
        assert_eq!(store.alerts_status(), CollectionStatus::Idle);
        assert!(store.last_refresh().is_none());
    }
}
