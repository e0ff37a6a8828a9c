//! Data bridge — connects [`Controller`] streams to TUI actions.
//!
//! Runs as a background task: subscribes to entity streams, per-collection
//! statuses, and connection state from the controller, forwarding every
//! change as an [`Action`] through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use spiderweb_core::{ConnectionState, Controller};

use crate::action::{Action, CollectionKind};

/// Spawn the data bridge connecting [`Controller`] reactive streams to the
/// TUI. Connects to the backend, sends initial data snapshots, then loops
/// forwarding every entity change, status transition, and connection-state
/// change as an [`Action`]. Shuts down cleanly on cancellation.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let _ = action_tx.send(Action::Connecting);

    if let Err(e) = controller.connect().await {
        warn!(error = %e, "failed to connect to backend");
        let _ = action_tx.send(Action::Disconnected(format!("{e}")));
        return;
    }

    let _ = action_tx.send(Action::Connected);

    // Subscribe to entity streams
    let mut networks = controller.networks();
    let mut core_sites = controller.core_sites();
    let mut core_devices = controller.core_devices();
    let mut links = controller.links();
    let mut end_sites = controller.end_sites();
    let mut alerts = controller.alerts();
    let mut conn_state = controller.connection_state();
    let [
        mut networks_status,
        mut core_sites_status,
        mut core_devices_status,
        mut links_status,
        mut end_sites_status,
        mut alerts_status,
    ] = controller.statuses();

    // Push initial snapshots so screens have data immediately
    let _ = action_tx.send(Action::NetworksUpdated(networks.current().clone()));
    let _ = action_tx.send(Action::CoreSitesUpdated(core_sites.current().clone()));
    let _ = action_tx.send(Action::CoreDevicesUpdated(core_devices.current().clone()));
    let _ = action_tx.send(Action::LinksUpdated(links.current().clone()));
    let _ = action_tx.send(Action::EndSitesUpdated(end_sites.current().clone()));
    let _ = action_tx.send(Action::AlertsUpdated(alerts.current().clone()));

    // Push initial statuses (the initial load has already settled them)
    let store = controller.store();
    let _ = action_tx.send(Action::StatusChanged(
        CollectionKind::Networks,
        store.networks_status(),
    ));
    let _ = action_tx.send(Action::StatusChanged(
        CollectionKind::CoreSites,
        store.core_sites_status(),
    ));
    let _ = action_tx.send(Action::StatusChanged(
        CollectionKind::CoreDevices,
        store.core_devices_status(),
    ));
    let _ = action_tx.send(Action::StatusChanged(
        CollectionKind::Links,
        store.links_status(),
    ));
    let _ = action_tx.send(Action::StatusChanged(
        CollectionKind::EndSites,
        store.end_sites_status(),
    ));
    let _ = action_tx.send(Action::StatusChanged(
        CollectionKind::Alerts,
        store.alerts_status(),
    ));

    // Stream loop — forward every change until cancelled
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(n) = networks.changed() => {
                let _ = action_tx.send(Action::NetworksUpdated(n));
            }
            Some(s) = core_sites.changed() => {
                let _ = action_tx.send(Action::CoreSitesUpdated(s));
            }
            Some(d) = core_devices.changed() => {
                let _ = action_tx.send(Action::CoreDevicesUpdated(d));
            }
            Some(l) = links.changed() => {
                let _ = action_tx.send(Action::LinksUpdated(l));
            }
            Some(e) = end_sites.changed() => {
                let _ = action_tx.send(Action::EndSitesUpdated(e));
            }
            Some(a) = alerts.changed() => {
                let _ = action_tx.send(Action::AlertsUpdated(a));
            }

            Ok(()) = networks_status.changed() => {
                let status = networks_status.borrow_and_update().clone();
                let _ = action_tx.send(Action::StatusChanged(CollectionKind::Networks, status));
            }
            Ok(()) = core_sites_status.changed() => {
                let status = core_sites_status.borrow_and_update().clone();
                let _ = action_tx.send(Action::StatusChanged(CollectionKind::CoreSites, status));
            }
            Ok(()) = core_devices_status.changed() => {
                let status = core_devices_status.borrow_and_update().clone();
                let _ = action_tx.send(Action::StatusChanged(CollectionKind::CoreDevices, status));
            }
            Ok(()) = links_status.changed() => {
                let status = links_status.borrow_and_update().clone();
                let _ = action_tx.send(Action::StatusChanged(CollectionKind::Links, status));
            }
            Ok(()) = end_sites_status.changed() => {
                let status = end_sites_status.borrow_and_update().clone();
                let _ = action_tx.send(Action::StatusChanged(CollectionKind::EndSites, status));
            }
            Ok(()) = alerts_status.changed() => {
                let status = alerts_status.borrow_and_update().clone();
                let _ = action_tx.send(Action::StatusChanged(CollectionKind::Alerts, status));
            }

            Ok(()) = conn_state.changed() => {
                let state = conn_state.borrow_and_update().clone();
                match state {
                    ConnectionState::Connected => {
                        let _ = action_tx.send(Action::Connected);
                    }
                    ConnectionState::Disconnected => {
                        let _ = action_tx.send(Action::Disconnected("disconnected".into()));
                    }
                    ConnectionState::Failed => {
                        let _ = action_tx.send(Action::Disconnected("connection failed".into()));
                    }
                    ConnectionState::Connecting => {
                        let _ = action_tx.send(Action::Connecting);
                    }
                }
            }
        }
    }

    controller.logout().await;
    debug!("data bridge shut down");
}
