#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spiderweb_api::{ApiClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

async fn setup_authed() -> (MockServer, ApiClient) {
    let (server, client) = setup().await;
    client.set_token(SecretString::from("test-token".to_owned()));
    (server, client)
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_installs_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "admin", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-123"})))
        .mount(&server)
        .await;

    let secret = SecretString::from("hunter2".to_owned());
    client.login("admin", &secret).await.unwrap();
    assert!(client.has_token());
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "bad credentials"})))
        .mount(&server)
        .await;

    let secret = SecretString::from("wrong".to_owned());
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.has_token());
}

#[tokio::test]
async fn test_calls_without_token_fail_fast() {
    let (_server, client) = setup().await;

    let result = client.list_networks().await;
    assert!(matches!(result, Err(Error::MissingToken)));
}

// ── Topology endpoint tests ─────────────────────────────────────────

#[tokio::test]
async fn test_list_networks_sends_bearer_token() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/networks"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "L"},
            {"id": 2, "name": "P"}
        ])))
        .mount(&server)
        .await;

    let networks = client.list_networks().await.unwrap();

    assert_eq!(networks.len(), 2);
    assert_eq!(networks[0].name, "L");
    assert_eq!(networks[1].name, "P");
}

#[tokio::test]
async fn test_list_core_sites_hits_network_scoped_path() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/network/1/coresites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "name": "North DC"}
        ])))
        .mount(&server)
        .await;

    let sites = client.list_core_sites(&1.into()).await.unwrap();

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name, "North DC");
}

#[tokio::test]
async fn test_link_endpoints_accept_string_ids() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/coreDevice/rtr-01/links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "link-10g-abc", "source": "rtr-01", "target": "rtr-02",
             "status": "up", "bandwidth": "10G"}
        ])))
        .mount(&server)
        .await;

    let links = client.core_to_core_links(&"rtr-01".into()).await.unwrap();

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].status.as_deref(), Some("up"));
    assert_eq!(links[0].bandwidth.as_deref(), Some("10G"));
}

// ── Mutation tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_core_device() {
    let (server, client) = setup_authed().await;

    Mock::given(method("DELETE"))
        .and(path("/coredevice/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_core_device(&42.into()).await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_expired_token_maps_to_session_expired() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_alerts().await;

    assert!(matches!(result, Err(Error::SessionExpired)));
    assert!(result.unwrap_err().is_auth_expired());
}

#[tokio::test]
async fn test_backend_error_message_is_surfaced() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/endsites"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "database unavailable"})),
        )
        .mount(&server)
        .await;

    match client.list_end_sites().await {
        Err(Error::Api { message, status }) => {
            assert_eq!(status, 500);
            assert!(message.contains("database unavailable"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/networks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    match client.list_networks().await {
        Err(Error::Deserialization { message, .. }) => {
            assert!(message.contains("body preview"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
