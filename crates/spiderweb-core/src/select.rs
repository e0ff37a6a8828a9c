// ── Derived selectors ──
//
// Pure, memoized view computations over DataStore snapshots. Each selector
// declares its input collections; results are cached per argument and keyed
// on the input collections' version counters, so a selector recomputes only
// when something it reads has actually changed. No side effects, no network
// access.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::model::{Alert, AlertSeverity, CoreDevice, CoreSite, EndSite, EntityId, Link, LinkStatus};
use crate::store::DataStore;

// ── Derived shapes ──────────────────────────────────────────────────

/// One node of the topology projection. `zone` is the owning core-site
/// name -- the renderer clusters nodes by zone.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyNode {
    pub id: EntityId,
    pub name: String,
    pub zone: String,
}

/// One edge of the topology projection.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyLink {
    pub source: EntityId,
    pub target: EntityId,
    pub status: LinkStatus,
}

/// The `{nodes, links}` shape the graph view consumes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopologyGraph {
    pub nodes: Vec<TopologyNode>,
    pub links: Vec<TopologyLink>,
}

/// End-sites sharing one English site name (a branch with several uplinks
/// appears once, with all its connection records grouped).
#[derive(Debug, Clone, Serialize)]
pub struct EndSiteGroup {
    pub site_name_english: String,
    pub site_name_hebrew: String,
    pub sites: Vec<Arc<EndSite>>,
}

/// Alert totals per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl AlertCounts {
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }
}

// ── Memoization cell ────────────────────────────────────────────────

/// Per-argument cache keyed on an input-version signature. Two calls with
/// the same key and signature return the same `Arc` without recomputing.
struct Memo<K, V> {
    cache: Mutex<HashMap<K, (Vec<u64>, Arc<V>)>>,
}

impl<K: Eq + Hash, V> Memo<K, V> {
    fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn get_or_compute(&self, key: K, signature: Vec<u64>, compute: impl FnOnce() -> V) -> Arc<V> {
        let mut cache = self.cache.lock().expect("selector cache poisoned");
        if let Some((cached_sig, value)) = cache.get(&key) {
            if *cached_sig == signature {
                return Arc::clone(value);
            }
        }
        let value = Arc::new(compute());
        cache.insert(key, (signature, Arc::clone(&value)));
        value
    }
}

// ── Selectors ───────────────────────────────────────────────────────

/// Memoized derived views over a [`DataStore`].
///
/// Cheap to keep around for the lifetime of a view; cloneless reads hand
/// out `Arc`s to cached results.
pub struct Selectors {
    store: Arc<DataStore>,
    sites_for_network_cache: Memo<EntityId, Vec<Arc<CoreSite>>>,
    devices_for_site_cache: Memo<EntityId, Vec<Arc<CoreDevice>>>,
    links_for_network_cache: Memo<EntityId, Vec<Arc<Link>>>,
    end_sites_for_device_cache: Memo<EntityId, Vec<Arc<EndSite>>>,
    end_site_groups_cache: Memo<(), Vec<EndSiteGroup>>,
    alert_counts_cache: Memo<(), AlertCounts>,
    topology_cache: Memo<EntityId, TopologyGraph>,
}

impl Selectors {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self {
            store,
            sites_for_network_cache: Memo::new(),
            devices_for_site_cache: Memo::new(),
            links_for_network_cache: Memo::new(),
            end_sites_for_device_cache: Memo::new(),
            end_site_groups_cache: Memo::new(),
            alert_counts_cache: Memo::new(),
            topology_cache: Memo::new(),
        }
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    /// Core sites belonging to one network, sorted by name.
    pub fn core_sites_for_network(&self, network_id: &EntityId) -> Arc<Vec<Arc<CoreSite>>> {
        let store = &self.store;
        let sig = vec![store.core_sites.version()];
        self.sites_for_network_cache
            .get_or_compute(network_id.clone(), sig, || {
                let mut sites: Vec<Arc<CoreSite>> = store
                    .core_sites_snapshot()
                    .iter()
                    .filter(|s| &s.network_id == network_id)
                    .map(Arc::clone)
                    .collect();
                sites.sort_by(|a, b| a.name.cmp(&b.name));
                sites
            })
    }

    /// Core devices at one site, sorted by name.
    pub fn devices_for_site(&self, core_site_id: &EntityId) -> Arc<Vec<Arc<CoreDevice>>> {
        let store = &self.store;
        let sig = vec![store.core_devices.version()];
        self.devices_for_site_cache
            .get_or_compute(core_site_id.clone(), sig, || {
                let mut devices: Vec<Arc<CoreDevice>> = store
                    .core_devices_snapshot()
                    .iter()
                    .filter(|d| &d.core_site_id == core_site_id)
                    .map(Arc::clone)
                    .collect();
                devices.sort_by(|a, b| a.name.cmp(&b.name));
                devices
            })
    }

    /// Core devices at the site with the given display name, if any.
    pub fn devices_for_site_name(&self, name: &str) -> Arc<Vec<Arc<CoreDevice>>> {
        let site = self
            .store
            .core_sites_snapshot()
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.id.clone());
        match site {
            Some(id) => self.devices_for_site(&id),
            None => Arc::new(Vec::new()),
        }
    }

    /// All links belonging to a network: a link qualifies when its source
    /// or target device traces device → site → network into the target
    /// network. Sorted by id for stable rendering.
    pub fn links_for_network(&self, network_id: &EntityId) -> Arc<Vec<Arc<Link>>> {
        let store = &self.store;
        let sig = vec![
            store.links.version(),
            store.core_devices.version(),
            store.core_sites.version(),
        ];
        self.links_for_network_cache
            .get_or_compute(network_id.clone(), sig, || {
                let device_ids = self.network_device_ids(network_id);
                let mut links: Vec<Arc<Link>> = store
                    .links_snapshot()
                    .iter()
                    .filter(|l| device_ids.contains(&l.source) || device_ids.contains(&l.target))
                    .map(Arc::clone)
                    .collect();
                links.sort_by_key(|l| l.id.to_string());
                links
            })
    }

    /// End-sites hanging off one core device, sorted by English name.
    pub fn end_sites_for_device(&self, device_id: &EntityId) -> Arc<Vec<Arc<EndSite>>> {
        let store = &self.store;
        let sig = vec![store.end_sites.version()];
        self.end_sites_for_device_cache
            .get_or_compute(device_id.clone(), sig, || {
                let mut sites: Vec<Arc<EndSite>> = store
                    .end_sites_snapshot()
                    .iter()
                    .filter(|e| &e.device_id == device_id)
                    .map(Arc::clone)
                    .collect();
                sites.sort_by(|a, b| a.site_name_english.cmp(&b.site_name_english));
                sites
            })
    }

    /// All end-sites grouped by English site name, groups sorted by name.
    pub fn end_site_groups(&self) -> Arc<Vec<EndSiteGroup>> {
        let store = &self.store;
        let sig = vec![store.end_sites.version()];
        self.end_site_groups_cache.get_or_compute((), sig, || {
            let mut by_name: BTreeMap<String, Vec<Arc<EndSite>>> = BTreeMap::new();
            for site in store.end_sites_snapshot().iter() {
                by_name
                    .entry(site.site_name_english.clone())
                    .or_default()
                    .push(Arc::clone(site));
            }
            by_name
                .into_iter()
                .map(|(name, mut sites)| {
                    sites.sort_by_key(|s| s.id.to_string());
                    EndSiteGroup {
                        site_name_hebrew: sites
                            .first()
                            .map(|s| s.site_name_hebrew.clone())
                            .unwrap_or_default(),
                        site_name_english: name,
                        sites,
                    }
                })
                .collect()
        })
    }

    /// Alert totals per severity.
    pub fn alert_counts(&self) -> Arc<AlertCounts> {
        let store = &self.store;
        let sig = vec![store.alerts.version()];
        self.alert_counts_cache.get_or_compute((), sig, || {
            let mut counts = AlertCounts::default();
            for alert in store.alerts_snapshot().iter() {
                match alert.severity {
                    AlertSeverity::Error => counts.error += 1,
                    AlertSeverity::Warning => counts.warning += 1,
                    AlertSeverity::Info => counts.info += 1,
                }
            }
            counts
        })
    }

    /// Alerts filtered by severity and favorite flag, newest first.
    pub fn filtered_alerts(
        &self,
        severity: Option<AlertSeverity>,
        favorites_only: bool,
    ) -> Vec<Arc<Alert>> {
        let mut alerts: Vec<Arc<Alert>> = self
            .store
            .alerts_snapshot()
            .iter()
            .filter(|a| severity.is_none_or(|s| a.severity == s))
            .filter(|a| !favorites_only || a.is_favorite)
            .map(Arc::clone)
            .collect();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts
    }

    /// The `{nodes, links}` projection of one network's topology, as
    /// consumed by the graph renderer.
    pub fn topology_graph(&self, network_id: &EntityId) -> Arc<TopologyGraph> {
        let store = &self.store;
        let sig = vec![
            store.core_sites.version(),
            store.core_devices.version(),
            store.links.version(),
        ];
        self.topology_cache.get_or_compute(network_id.clone(), sig, || {
            let sites = store.core_sites_snapshot();
            let zone_names: HashMap<&EntityId, &str> = sites
                .iter()
                .filter(|s| &s.network_id == network_id)
                .map(|s| (&s.id, s.name.as_str()))
                .collect();

            let mut nodes: Vec<TopologyNode> = store
                .core_devices_snapshot()
                .iter()
                .filter_map(|d| {
                    zone_names.get(&d.core_site_id).map(|zone| TopologyNode {
                        id: d.id.clone(),
                        name: d.name.clone(),
                        zone: (*zone).to_owned(),
                    })
                })
                .collect();
            nodes.sort_by_key(|n| n.id.to_string());

            let links = self
                .links_for_network(network_id)
                .iter()
                .map(|l| TopologyLink {
                    source: l.source.clone(),
                    target: l.target.clone(),
                    status: l.status,
                })
                .collect();

            TopologyGraph { nodes, links }
        })
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Ids of every core device whose site belongs to the given network.
    fn network_device_ids(&self, network_id: &EntityId) -> HashSet<EntityId> {
        let sites = self.store.core_sites_snapshot();
        let site_ids: HashSet<&EntityId> = sites
            .iter()
            .filter(|s| &s.network_id == network_id)
            .map(|s| &s.id)
            .collect();

        self.store
            .core_devices_snapshot()
            .iter()
            .filter(|d| site_ids.contains(&d.core_site_id))
            .map(|d| d.id.clone())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{LinkKind, Network};
    use chrono::Utc;

    fn fixture() -> Arc<DataStore> {
        let store = Arc::new(DataStore::new());

        store.set_networks(vec![
            Network {
                id: EntityId::Num(1),
                name: "L".into(),
            },
            Network {
                id: EntityId::Num(2),
                name: "P".into(),
            },
        ]);
        store.set_core_sites(vec![
            CoreSite {
                id: EntityId::Num(10),
                name: "North DC".into(),
                network_id: EntityId::Num(1),
            },
            CoreSite {
                id: EntityId::Num(20),
                name: "South DC".into(),
                network_id: EntityId::Num(2),
            },
        ]);
        store.set_core_devices(vec![
            CoreDevice {
                id: EntityId::Num(100),
                name: "rtr-north-1".into(),
                ip_address: None,
                core_site_id: EntityId::Num(10),
            },
            CoreDevice {
                id: EntityId::Num(200),
                name: "rtr-south-1".into(),
                ip_address: None,
                core_site_id: EntityId::Num(20),
            },
        ]);
        store.set_links(vec![
            Link {
                id: EntityId::from("l-100-200"),
                source: EntityId::Num(100),
                target: EntityId::Num(200),
                status: LinkStatus::Up,
                bandwidth: Some("10G".into()),
                kind: LinkKind::CoreToCore,
            },
            Link {
                id: EntityId::from("l-100-es1"),
                source: EntityId::Num(100),
                target: EntityId::from("es-1"),
                status: LinkStatus::Issue,
                bandwidth: None,
                kind: LinkKind::CoreToSite,
            },
        ]);
        store.set_end_sites(vec![
            EndSite {
                id: EntityId::from("es-1"),
                device_id: EntityId::Num(100),
                site_name_english: "Haifa Branch".into(),
                site_name_hebrew: "חיפה".into(),
                interface_id: Some("ge-0/0/1".into()),
            },
            EndSite {
                id: EntityId::from("es-2"),
                device_id: EntityId::Num(100),
                site_name_english: "Haifa Branch".into(),
                site_name_hebrew: "חיפה".into(),
                interface_id: Some("ge-0/0/2".into()),
            },
        ]);

        store
    }

    #[test]
    fn links_trace_device_site_network_chain() {
        let selectors = Selectors::new(fixture());

        // Network 1 owns device 100: both links touch it.
        let links = selectors.links_for_network(&EntityId::Num(1));
        let ids: Vec<String> = links.iter().map(|l| l.id.to_string()).collect();
        assert_eq!(ids, vec!["l-100-200", "l-100-es1"]);

        // Network 2 owns device 200: only the trunk qualifies.
        let links = selectors.links_for_network(&EntityId::Num(2));
        let ids: Vec<String> = links.iter().map(|l| l.id.to_string()).collect();
        assert_eq!(ids, vec!["l-100-200"]);

        // Unknown network: nothing.
        assert!(selectors.links_for_network(&EntityId::Num(9)).is_empty());
    }

    #[test]
    fn selectors_are_cached_until_inputs_change() {
        let store = fixture();
        let selectors = Selectors::new(Arc::clone(&store));

        let first = selectors.links_for_network(&EntityId::Num(1));
        let second = selectors.links_for_network(&EntityId::Num(1));
        assert!(Arc::ptr_eq(&first, &second), "expected a cache hit");

        // Mutating an input collection invalidates the cache.
        store.update_link_status(&EntityId::from("l-100-200"), LinkStatus::Down);
        let third = selectors.links_for_network(&EntityId::Num(1));
        assert!(!Arc::ptr_eq(&first, &third), "expected a recompute");
        let trunk = third
            .iter()
            .find(|l| l.id == EntityId::from("l-100-200"))
            .unwrap();
        assert_eq!(trunk.status, LinkStatus::Down);

        // Mutating an unrelated collection does not.
        store.set_end_sites(vec![]);
        let fourth = selectors.links_for_network(&EntityId::Num(1));
        assert!(Arc::ptr_eq(&third, &fourth));
    }

    #[test]
    fn devices_resolve_by_site_and_by_name() {
        let selectors = Selectors::new(fixture());

        let by_id = selectors.devices_for_site(&EntityId::Num(10));
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].name, "rtr-north-1");

        let by_name = selectors.devices_for_site_name("North DC");
        assert_eq!(by_name.len(), 1);
        assert!(selectors.devices_for_site_name("Nowhere").is_empty());
    }

    #[test]
    fn end_sites_group_by_english_name() {
        let selectors = Selectors::new(fixture());

        let groups = selectors.end_site_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].site_name_english, "Haifa Branch");
        assert_eq!(groups[0].sites.len(), 2);

        let for_device = selectors.end_sites_for_device(&EntityId::Num(100));
        assert_eq!(for_device.len(), 2);
    }

    #[test]
    fn topology_graph_projects_zones_and_statuses() {
        let selectors = Selectors::new(fixture());

        let graph = selectors.topology_graph(&EntityId::Num(1));
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].zone, "North DC");
        assert_eq!(graph.links.len(), 2);
        assert!(
            graph
                .links
                .iter()
                .any(|l| l.status == LinkStatus::Issue && l.target == EntityId::from("es-1"))
        );
    }

    #[test]
    fn alert_counts_sum_by_severity() {
        let store = fixture();
        let mk = |id: &str, severity| Alert {
            id: EntityId::from(id),
            severity,
            message: String::new(),
            timestamp: Utc::now(),
            is_favorite: false,
            source: None,
            network_line: None,
            severity_score: None,
            details: None,
        };
        store.set_alerts(vec![
            mk("a-1", AlertSeverity::Error),
            mk("a-2", AlertSeverity::Warning),
            mk("a-3", AlertSeverity::Warning),
        ]);

        let selectors = Selectors::new(store);
        let counts = selectors.alert_counts();
        assert_eq!(counts.error, 1);
        assert_eq!(counts.warning, 2);
        assert_eq!(counts.info, 0);
        assert_eq!(counts.total(), 3);
    }
}
