// ── Fetch orchestration ──
//
// The dependent fetch waterfall: networks → core sites → core devices →
// links, with fan-out/fan-in concurrency inside each stage and strictly
// sequential stages (each consumes the previous stage's ids). End-sites
// and alerts have no dependency and load alongside the waterfall.
//
// Status protocol: a stage flips its collection to Loading before its
// requests and Succeeded/Failed after. A failed stage halts its dependent
// downstream stages -- their collections keep whatever status and contents
// they already had, so unaffected views keep working. Retry is an explicit
// user action and restarts from stage 1.

use std::collections::HashMap;

use futures::future::try_join_all;
use tracing::{debug, warn};

use spiderweb_api::{ApiClient, Error as ApiError};

use crate::convert;
use crate::error::CoreError;
use crate::model::{CoreDevice, CoreSite, EntityId, Link, LinkKind, Network};
use crate::store::{CollectionStatus, DataStore};

/// Run the full initial load: the topology waterfall plus the independent
/// end-site and alert fetches.
///
/// Fetch failures are recorded in the per-collection statuses and do NOT
/// bubble up -- except authentication expiry, which no stage can recover
/// from and which the controller must surface.
pub(crate) async fn run(client: &ApiClient, store: &DataStore) -> Result<(), CoreError> {
    let (waterfall, end_sites, alerts) = tokio::join!(
        run_waterfall(client, store),
        load_end_sites(client, store),
        load_alerts(client, store, true),
    );

    let mut all_ok = true;
    for result in [waterfall, end_sites, alerts] {
        if let Err(e) = result {
            all_ok = false;
            if e.is_auth_expired() {
                return Err(e.into());
            }
        }
    }

    if all_ok {
        store.mark_refreshed();
    }
    Ok(())
}

/// Stages 1-4. Returns the first stage error (already recorded in the
/// failing collection's status) so the caller can inspect it.
async fn run_waterfall(client: &ApiClient, store: &DataStore) -> Result<(), ApiError> {
    // ── Stage 1: networks ────────────────────────────────────────────
    store.networks_status.set(CollectionStatus::Loading);
    let networks = match stage_networks(client).await {
        Ok(networks) => {
            store.set_networks(networks.clone());
            store.networks_status.set(CollectionStatus::Succeeded);
            networks
        }
        Err(e) => {
            warn!(error = %e, "network fetch failed, halting waterfall");
            store
                .networks_status
                .set(CollectionStatus::Failed(e.to_string()));
            return Err(e);
        }
    };
    let network_ids: Vec<EntityId> = networks.iter().map(|n| n.id.clone()).collect();

    // ── Stage 2: core sites (one request per network) ────────────────
    store.core_sites_status.set(CollectionStatus::Loading);
    let sites = match stage_core_sites(client, &network_ids).await {
        Ok(sites) => {
            store.set_core_sites(sites.clone());
            store.core_sites_status.set(CollectionStatus::Succeeded);
            sites
        }
        Err(e) => {
            warn!(error = %e, "core-site fetch failed, halting waterfall");
            store
                .core_sites_status
                .set(CollectionStatus::Failed(e.to_string()));
            return Err(e);
        }
    };
    let site_ids: Vec<EntityId> = sites.iter().map(|s| s.id.clone()).collect();

    // ── Stage 3: core devices (one request per site) ─────────────────
    store.core_devices_status.set(CollectionStatus::Loading);
    let devices = match stage_core_devices(client, &site_ids).await {
        Ok(devices) => {
            store.set_core_devices(devices.clone());
            store.core_devices_status.set(CollectionStatus::Succeeded);
            devices
        }
        Err(e) => {
            warn!(error = %e, "core-device fetch failed, halting waterfall");
            store
                .core_devices_status
                .set(CollectionStatus::Failed(e.to_string()));
            return Err(e);
        }
    };
    let device_ids: Vec<EntityId> = devices.iter().map(|d| d.id.clone()).collect();

    // ── Stage 4: links (two requests per device) ─────────────────────
    store.links_status.set(CollectionStatus::Loading);
    match stage_links(client, &device_ids).await {
        Ok(links) => {
            store.set_links(links);
            store.links_status.set(CollectionStatus::Succeeded);
        }
        Err(e) => {
            warn!(error = %e, "link fetch failed");
            store
                .links_status
                .set(CollectionStatus::Failed(e.to_string()));
            return Err(e);
        }
    }

    debug!(
        networks = store.network_count(),
        sites = store.core_site_count(),
        devices = store.core_device_count(),
        links = store.link_count(),
        "topology waterfall complete"
    );
    Ok(())
}

// ── Stage fetchers ──────────────────────────────────────────────────
//
// Each stage fires all of its requests concurrently and awaits them all;
// any sub-request failure fails the whole stage.

async fn stage_networks(client: &ApiClient) -> Result<Vec<Network>, ApiError> {
    let dtos = client.list_networks().await?;
    Ok(dtos.into_iter().map(convert::network).collect())
}

pub(crate) async fn stage_core_sites(
    client: &ApiClient,
    network_ids: &[EntityId],
) -> Result<Vec<CoreSite>, ApiError> {
    let per_network = network_ids.iter().map(|network_id| async move {
        let dtos = client.list_core_sites(&network_id.into()).await?;
        Ok::<_, ApiError>(
            dtos.into_iter()
                .map(|dto| convert::core_site(dto, network_id))
                .collect::<Vec<_>>(),
        )
    });
    Ok(try_join_all(per_network).await?.into_iter().flatten().collect())
}

pub(crate) async fn stage_core_devices(
    client: &ApiClient,
    site_ids: &[EntityId],
) -> Result<Vec<CoreDevice>, ApiError> {
    let per_site = site_ids.iter().map(|site_id| async move {
        let dtos = client.list_core_devices(&site_id.into()).await?;
        Ok::<_, ApiError>(
            dtos.into_iter()
                .map(|dto| convert::core_device(dto, site_id))
                .collect::<Vec<_>>(),
        )
    });
    Ok(try_join_all(per_site).await?.into_iter().flatten().collect())
}

async fn stage_links(client: &ApiClient, device_ids: &[EntityId]) -> Result<Vec<Link>, ApiError> {
    let per_device = device_ids.iter().map(|device_id| async move {
        let dto_id = device_id.into();
        // Both link kinds for one device, concurrently.
        let (core, site) = tokio::try_join!(
            client.core_to_core_links(&dto_id),
            client.core_to_site_links(&dto_id),
        )?;

        let mut links: Vec<Link> = core
            .into_iter()
            .map(|dto| convert::link(dto, LinkKind::CoreToCore))
            .collect();
        links.extend(site.into_iter().map(|dto| convert::link(dto, LinkKind::CoreToSite)));
        Ok::<_, ApiError>(links)
    });

    // A trunk shows up from both of its endpoint devices; merge by id.
    let mut merged: HashMap<EntityId, Link> = HashMap::new();
    for links in try_join_all(per_device).await? {
        for link in links {
            merged.entry(link.id.clone()).or_insert(link);
        }
    }
    Ok(merged.into_values().collect())
}

// ── Independent fetches ─────────────────────────────────────────────

async fn load_end_sites(client: &ApiClient, store: &DataStore) -> Result<(), ApiError> {
    store.end_sites_status.set(CollectionStatus::Loading);
    match client.list_end_sites().await {
        Ok(dtos) => {
            store.set_end_sites(dtos.into_iter().map(convert::end_site).collect());
            store.end_sites_status.set(CollectionStatus::Succeeded);
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "end-site fetch failed");
            store
                .end_sites_status
                .set(CollectionStatus::Failed(e.to_string()));
            Err(e)
        }
    }
}

/// Fetch alerts into the store. The initial load announces itself via the
/// Loading state; the periodic poll passes `announce: false` so the status
/// doesn't flicker on every tick.
pub(crate) async fn load_alerts(
    client: &ApiClient,
    store: &DataStore,
    announce: bool,
) -> Result<(), ApiError> {
    if announce {
        store.alerts_status.set(CollectionStatus::Loading);
    }
    match client.list_alerts().await {
        Ok(dtos) => {
            store.set_alerts(dtos.into_iter().map(convert::alert).collect());
            store.alerts_status.set(CollectionStatus::Succeeded);
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "alert fetch failed");
            store
                .alerts_status
                .set(CollectionStatus::Failed(e.to_string()));
            Err(e)
        }
    }
}

// ── Scoped re-fetches (post-mutation) ───────────────────────────────

/// Re-fetch the core sites of one network after an add/delete.
pub(crate) async fn refetch_core_sites(
    client: &ApiClient,
    store: &DataStore,
    network_id: &EntityId,
) -> Result<(), ApiError> {
    let sites = stage_core_sites(client, std::slice::from_ref(network_id)).await?;
    store.set_core_sites_for_network(network_id, sites);
    Ok(())
}

/// Re-fetch the core devices of one site after an add/delete.
pub(crate) async fn refetch_core_devices(
    client: &ApiClient,
    store: &DataStore,
    core_site_id: &EntityId,
) -> Result<(), ApiError> {
    let devices = stage_core_devices(client, std::slice::from_ref(core_site_id)).await?;
    store.set_core_devices_for_site(core_site_id, devices);
    Ok(())
}
