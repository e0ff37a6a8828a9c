// ── Runtime connection configuration ──
//
// These types describe *how* to reach the NOC backend. They carry
// credential data and connection tuning, but never touch disk -- the
// CLI/TUI constructs a `BackendConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How to authenticate with the backend.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// A previously issued session token (restored from the token cache).
    Token(SecretString),
    /// Username + password; `connect()` performs the login exchange.
    Credentials {
        username: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed lab backends).
    DangerAcceptInvalid,
}

/// Configuration for a single backend session.
///
/// Built by CLI/TUI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend API root (e.g., `http://localhost:8000/api`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How often the alert poll task re-fetches alerts. Zero disables polling.
    pub alert_poll_interval: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/api"
                .parse()
                .expect("default URL is valid"),
            auth: AuthCredentials::Credentials {
                username: "admin".into(),
                password: SecretString::from(String::new()),
            },
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            alert_poll_interval: Duration::from_secs(30),
        }
    }
}
