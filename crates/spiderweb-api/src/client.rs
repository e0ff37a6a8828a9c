// Backend HTTP client
//
// Wraps `reqwest::Client` with bearer-token injection, URL construction,
// and error-body mapping. All endpoint modules (networks, links, etc.)
// are implemented as inherent methods via separate files to keep this
// module focused on transport mechanics.

use std::sync::RwLock;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Raw HTTP client for the Spiderweb NOC backend.
///
/// The backend speaks plain JSON: every list endpoint returns a bare array
/// of entities, every failure a non-2xx status with `{"error": "..."}`.
/// Authentication is a bearer token obtained from `POST /login` and held
/// in a swappable slot so one client survives re-login.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Session token. `None` until `login()` succeeds or a stored token
    /// is installed via [`set_token`](Self::set_token).
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`. The `base_url` should
    /// include the API root (e.g. `https://noc.example.net/api`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Install a session token (e.g. one restored from the token cache).
    pub fn set_token(&self, token: SecretString) {
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Drop the session token. Subsequent authenticated calls fail with
    /// [`Error::MissingToken`].
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// Whether a session token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path relative to the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let full = format!("{base}/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Attach the bearer token, failing if none is installed.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => Ok(builder.bearer_auth(token.expose_secret())),
            None => Err(Error::MissingToken),
        }
    }

    /// Send an authenticated GET request and decode the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let builder = self.authorize(self.http.get(url))?;
        let resp = builder.send().await.map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Send an authenticated POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let builder = self.authorize(self.http.post(url).json(body))?;
        let resp = builder.send().await.map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// POST without authentication (login only).
    pub(crate) async fn post_unauthenticated<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Send an authenticated DELETE request. The backend returns an empty
    /// or throwaway body on success, so this discards it.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let builder = self.authorize(self.http.delete(url))?;
        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::error_from_body(status, resp.text().await.unwrap_or_default()))
    }

    /// Decode a JSON response, mapping failure statuses to typed errors.
    async fn parse_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            // Token rejected -- the caller decides whether to re-login.
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Self::error_from_body(status, body));
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Map a non-2xx response into an `Error`, preferring the backend's
    /// own message over a raw body preview.
    fn error_from_body(status: StatusCode, body: String) -> Error {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                let preview = &body[..body.len().min(200)];
                format!("HTTP {status}: {preview}")
            });

        if status == StatusCode::FORBIDDEN {
            return Error::Authentication { message };
        }

        Error::Api {
            message,
            status: status.as_u16(),
        }
    }
}
