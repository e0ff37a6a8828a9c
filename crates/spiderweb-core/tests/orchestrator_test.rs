#![allow(clippy::unwrap_used)]
// Integration tests for the fetch waterfall, store lifecycle, and command
// dispatch, using a wiremock backend.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spiderweb_core::{
    AuthCredentials, BackendConfig, CollectionStatus, Command, CommandResult, Controller,
    EntityId, LinkStatus, Selectors, TlsVerification,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> BackendConfig {
    BackendConfig {
        url: Url::parse(&server.uri()).unwrap(),
        auth: AuthCredentials::Token(SecretString::from("test-token".to_owned())),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
        // Tests drive refreshes explicitly.
        alert_poll_interval: Duration::ZERO,
    }
}

async fn mount_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Two networks, one site each, one device each, one shared trunk link,
/// one access link, two end-sites, two alerts.
async fn mount_full_topology(server: &MockServer) {
    mount_get(
        server,
        "/networks",
        json!([{"id": 1, "name": "L"}, {"id": 2, "name": "P"}]),
    )
    .await;
    mount_get(
        server,
        "/network/1/coresites",
        json!([{"id": 10, "name": "North DC"}]),
    )
    .await;
    mount_get(
        server,
        "/network/2/coresites",
        json!([{"id": 20, "name": "South DC"}]),
    )
    .await;
    mount_get(
        server,
        "/coresite/10/coredevices",
        json!([{"id": 100, "name": "rtr-north-1", "ip": "10.0.0.1"}]),
    )
    .await;
    mount_get(
        server,
        "/coresite/20/coredevices",
        json!([{"id": 200, "name": "rtr-south-1", "ip": "10.0.1.1"}]),
    )
    .await;

    // The trunk is reported by both of its endpoint devices.
    let trunk = json!({
        "id": "l-100-200", "source": 100, "target": 200,
        "status": "up", "bandwidth": "10G"
    });
    mount_get(server, "/coreDevice/100/links", json!([trunk])).await;
    mount_get(server, "/coreDevice/200/links", json!([trunk])).await;
    mount_get(
        server,
        "/device/100/end-sites",
        json!([{
            "id": "l-100-es1", "source": 100, "target": "es-1",
            "status": "issue", "bandwidth": "1G"
        }]),
    )
    .await;
    mount_get(server, "/device/200/end-sites", json!([])).await;

    mount_get(
        server,
        "/endsites",
        json!([
            {"id": "es-1", "device_id": 100, "site_name_english": "Haifa Branch",
             "site_name_hebrew": "חיפה", "interface_id": "ge-0/0/1"},
            {"id": "es-2", "device_id": 200, "site_name_english": "Eilat Branch",
             "site_name_hebrew": "אילת", "interface_id": "ge-0/0/4"}
        ]),
    )
    .await;
    mount_get(
        server,
        "/alerts",
        json!([
            {"id": "alert-1", "type": "error", "message": "High packet drop on rtr-north-1",
             "timestamp": "2024-06-15T10:30:00Z"},
            {"id": "link-10g-abc", "type": "warning", "message": "Latency threshold exceeded",
             "timestamp": "2024-06-15T10:31:00Z"}
        ]),
    )
    .await;
}

// ── Waterfall tests ─────────────────────────────────────────────────

#[tokio::test]
async fn waterfall_tags_parent_ids_and_settles_succeeded() {
    let server = MockServer::start().await;
    mount_full_topology(&server).await;

    let ctrl = Controller::oneshot(config_for(&server)).await.unwrap();
    let store = ctrl.store();

    // Every fetched core site carries the network id it was fetched for.
    for site in store.core_sites_snapshot().iter() {
        let expected = if site.id == EntityId::Num(10) { 1 } else { 2 };
        assert_eq!(site.network_id, EntityId::Num(expected));
    }

    // Every fetched device carries the site id it was fetched for.
    for device in store.core_devices_snapshot().iter() {
        let expected = if device.id == EntityId::Num(100) { 10 } else { 20 };
        assert_eq!(device.core_site_id, EntityId::Num(expected));
    }

    // The trunk reported by both endpoints is merged to a single record.
    assert_eq!(store.link_count(), 2);

    assert_eq!(store.networks_status(), CollectionStatus::Succeeded);
    assert_eq!(store.core_sites_status(), CollectionStatus::Succeeded);
    assert_eq!(store.core_devices_status(), CollectionStatus::Succeeded);
    assert_eq!(store.links_status(), CollectionStatus::Succeeded);
    assert_eq!(store.end_sites_status(), CollectionStatus::Succeeded);
    assert_eq!(store.alerts_status(), CollectionStatus::Succeeded);
    assert!(store.initial_load_settled());
    assert!(store.last_refresh().is_some());
}

#[tokio::test]
async fn stage_two_failure_halts_stages_three_and_four() {
    let server = MockServer::start().await;

    mount_get(&server, "/networks", json!([{"id": 1, "name": "L"}])).await;
    Mock::given(method("GET"))
        .and(path("/network/1/coresites"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
        .mount(&server)
        .await;

    // Downstream endpoints must never be hit.
    Mock::given(method("GET"))
        .and(path("/coresite/10/coredevices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/coreDevice/100/links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    mount_get(&server, "/endsites", json!([])).await;
    mount_get(&server, "/alerts", json!([])).await;

    let ctrl = Controller::oneshot(config_for(&server)).await.unwrap();
    let store = ctrl.store();

    // Stage 1 data stays visible; stage 2 failed with the backend message;
    // stages 3 and 4 never ran.
    assert_eq!(store.network_count(), 1);
    assert_eq!(store.networks_status(), CollectionStatus::Succeeded);
    assert!(store.core_sites_status().is_failed());
    assert!(
        store
            .core_sites_status()
            .error()
            .unwrap()
            .contains("db down")
    );
    assert_eq!(store.core_devices_status(), CollectionStatus::Idle);
    assert_eq!(store.links_status(), CollectionStatus::Idle);

    // Independent fetches still ran.
    assert_eq!(store.end_sites_status(), CollectionStatus::Succeeded);
    assert_eq!(store.alerts_status(), CollectionStatus::Succeeded);
    assert!(store.initial_load_settled());

    server.verify().await;
}

#[tokio::test]
async fn empty_core_site_list_skips_downstream_requests() {
    let server = MockServer::start().await;

    mount_get(&server, "/networks", json!([{"id": 1, "name": "L"}])).await;
    Mock::given(method("GET"))
        .and(path("/network/1/coresites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(&server, "/endsites", json!([])).await;
    mount_get(&server, "/alerts", json!([])).await;

    let ctrl = Controller::oneshot(config_for(&server)).await.unwrap();
    let store = ctrl.store();

    // No sites → the device and link stages run with an empty id list:
    // zero requests, empty collections, but still "succeeded".
    assert_eq!(store.core_site_count(), 0);
    assert_eq!(store.core_device_count(), 0);
    assert_eq!(store.link_count(), 0);
    assert_eq!(store.core_devices_status(), CollectionStatus::Succeeded);
    assert_eq!(store.links_status(), CollectionStatus::Succeeded);

    // Core sites were requested exactly once, for network 1 only.
    server.verify().await;
}

// ── Lifecycle tests ─────────────────────────────────────────────────

#[tokio::test]
async fn logout_resets_store_and_reconnect_starts_clean() {
    let server = MockServer::start().await;
    mount_full_topology(&server).await;

    let ctrl = Controller::oneshot(config_for(&server)).await.unwrap();
    assert!(ctrl.store().network_count() > 0);

    ctrl.logout().await;

    let store = ctrl.store();
    assert_eq!(store.network_count(), 0);
    assert_eq!(store.core_site_count(), 0);
    assert_eq!(store.core_device_count(), 0);
    assert_eq!(store.link_count(), 0);
    assert_eq!(store.end_site_count(), 0);
    assert_eq!(store.alert_count(), 0);
    assert_eq!(store.networks_status(), CollectionStatus::Idle);
    assert!(store.last_refresh().is_none());

    // Re-running the orchestrator after a logout starts from the empty
    // store and repopulates it identically.
    ctrl.connect().await.unwrap();
    assert_eq!(ctrl.store().network_count(), 2);
    assert_eq!(ctrl.store().links_status(), CollectionStatus::Succeeded);
    ctrl.logout().await;
}

// ── Selector-over-fetched-data tests ────────────────────────────────

#[tokio::test]
async fn links_for_network_traces_the_device_site_network_chain() {
    let server = MockServer::start().await;
    mount_full_topology(&server).await;

    let ctrl = Controller::oneshot(config_for(&server)).await.unwrap();
    let selectors = Selectors::new(Arc::clone(ctrl.store()));

    // Network 1 (device 100): the trunk and the access link.
    let ids: Vec<String> = selectors
        .links_for_network(&EntityId::Num(1))
        .iter()
        .map(|l| l.id.to_string())
        .collect();
    assert_eq!(ids, vec!["l-100-200", "l-100-es1"]);

    // Network 2 (device 200): only the trunk traces back.
    let ids: Vec<String> = selectors
        .links_for_network(&EntityId::Num(2))
        .iter()
        .map(|l| l.id.to_string())
        .collect();
    assert_eq!(ids, vec!["l-100-200"]);

    let graph = selectors.topology_graph(&EntityId::Num(1));
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].zone, "North DC");
    assert!(graph.links.iter().any(|l| l.status == LinkStatus::Issue));
}

// ── Command tests ───────────────────────────────────────────────────

#[tokio::test]
async fn favorite_toggle_flips_one_alert_and_survives_refresh() {
    let server = MockServer::start().await;
    mount_full_topology(&server).await;

    let ctrl = Controller::oneshot(config_for(&server)).await.unwrap();
    let id = EntityId::from("link-10g-abc");

    let result = ctrl
        .execute(Command::ToggleAlertFavorite { id: id.clone() })
        .await
        .unwrap();
    assert!(matches!(
        result,
        CommandResult::Favorite {
            is_favorite: true,
            ..
        }
    ));

    // Only the toggled alert changed.
    for alert in ctrl.store().alerts_snapshot().iter() {
        assert_eq!(alert.is_favorite, alert.id == id);
    }

    // A poll refresh replaces alert data but keeps the local pin.
    ctrl.execute(Command::RefreshAlerts).await.unwrap();
    let pinned = ctrl
        .store()
        .alerts_snapshot()
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.is_favorite);
    assert_eq!(pinned, Some(true));

    // Unknown ids are an error, not a silent no-op.
    let missing = ctrl
        .execute(Command::ToggleAlertFavorite {
            id: EntityId::from("no-such-alert"),
        })
        .await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn delete_core_device_refetches_only_its_site() {
    let server = MockServer::start().await;

    mount_get(&server, "/networks", json!([{"id": 1, "name": "L"}])).await;
    mount_get(
        &server,
        "/network/1/coresites",
        json!([{"id": 10, "name": "North DC"}, {"id": 11, "name": "West DC"}]),
    )
    .await;

    // Site 10 first returns two devices, then (after the delete) one.
    Mock::given(method("GET"))
        .and(path("/coresite/10/coredevices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 100, "name": "rtr-north-1"},
            {"id": 101, "name": "rtr-north-2"}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/coresite/10/coredevices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 100, "name": "rtr-north-1"}])),
        )
        .mount(&server)
        .await;
    mount_get(
        &server,
        "/coresite/11/coredevices",
        json!([{"id": 110, "name": "rtr-west-1"}]),
    )
    .await;

    for device in [100, 101, 110] {
        mount_get(&server, &format!("/coreDevice/{device}/links"), json!([])).await;
        mount_get(&server, &format!("/device/{device}/end-sites"), json!([])).await;
    }
    mount_get(&server, "/endsites", json!([])).await;
    mount_get(&server, "/alerts", json!([])).await;

    Mock::given(method("DELETE"))
        .and(path("/coredevice/101"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = Controller::oneshot(config_for(&server)).await.unwrap();
    assert_eq!(ctrl.store().core_device_count(), 3);

    ctrl.execute(Command::DeleteCoreDevice {
        id: EntityId::Num(101),
        core_site_id: EntityId::Num(10),
    })
    .await
    .unwrap();

    let store = ctrl.store();
    assert_eq!(store.core_device_count(), 2);
    assert!(store.core_device_by_id(&EntityId::Num(101)).is_none());
    // The other site's devices were not re-fetched or disturbed.
    assert!(store.core_device_by_id(&EntityId::Num(110)).is_some());

    server.verify().await;
}

// ── Auth tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn credential_auth_logs_in_before_fetching() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-xyz"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_full_topology(&server).await;

    let mut config = config_for(&server);
    config.auth = AuthCredentials::Credentials {
        username: "admin".into(),
        password: SecretString::from("hunter2".to_owned()),
    };

    let ctrl = Controller::oneshot(config).await.unwrap();
    assert_eq!(ctrl.store().network_count(), 2);
    server.verify().await;
}

#[tokio::test]
async fn bad_credentials_fail_the_connect() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "nope"})))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.auth = AuthCredentials::Credentials {
        username: "admin".into(),
        password: SecretString::from("wrong".to_owned()),
    };

    let result = Controller::oneshot(config).await;
    assert!(result.is_err());
}
