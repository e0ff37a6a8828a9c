//! Shared configuration for the Spiderweb CLI and TUI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), the
//! session-token cache, and translation to `spiderweb_core::BackendConfig`.
//! Both binaries depend on this crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use spiderweb_core::{AuthCredentials, BackendConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Alert poll interval in seconds (0 disables polling).
    #[serde(default = "default_alert_poll")]
    pub alert_poll_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            alert_poll_secs: default_alert_poll(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_alert_poll() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend API root (e.g., "http://localhost:8000/api").
    pub backend: String,

    /// Username for credential auth.
    pub username: Option<String>,

    /// Password (plaintext -- prefer env var or keyring).
    pub password: Option<String>,

    /// Session token (plaintext -- prefer the cache or keyring).
    pub token: Option<String>,

    /// Environment variable name containing a session token.
    pub token_env: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override alert poll interval (seconds).
    pub alert_poll_secs: Option<u64>,
}

// ── Config file paths ───────────────────────────────────────────────

/// Resolve the config directory via XDG / platform conventions.
fn config_dir() -> PathBuf {
    ProjectDirs::from("net", "spiderweb", "spiderweb").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("spiderweb");
            p
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

/// Resolve the config file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment (`SPIDERWEB_*`).
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("SPIDERWEB_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Session-token cache ─────────────────────────────────────────────
//
// The backend issues bearer tokens from `POST /login`; the CLI persists
// them here so subsequent invocations skip the login exchange. Cleared on
// `logout`. One file per profile.

fn token_path_in(dir: &Path, profile_name: &str) -> PathBuf {
    dir.join(format!("{profile_name}.token"))
}

/// Path of the cached session token for a profile.
pub fn token_path(profile_name: &str) -> PathBuf {
    token_path_in(&config_dir(), profile_name)
}

pub(crate) fn save_token_in(
    dir: &Path,
    profile_name: &str,
    token: &SecretString,
) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(token_path_in(dir, profile_name), token.expose_secret())?;
    Ok(())
}

pub(crate) fn load_token_in(dir: &Path, profile_name: &str) -> Option<SecretString> {
    let raw = std::fs::read_to_string(token_path_in(dir, profile_name)).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(SecretString::from(trimmed.to_owned()))
}

pub(crate) fn clear_token_in(dir: &Path, profile_name: &str) -> Result<(), ConfigError> {
    let path = token_path_in(dir, profile_name);
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Persist a session token for a profile.
pub fn save_session_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    save_token_in(&config_dir(), profile_name, token)
}

/// Read the cached session token for a profile, if any.
pub fn load_session_token(profile_name: &str) -> Option<SecretString> {
    load_token_in(&config_dir(), profile_name)
}

/// Remove the cached session token for a profile (logout).
pub fn clear_session_token(profile_name: &str) -> Result<(), ConfigError> {
    clear_token_in(&config_dir(), profile_name)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a session token from the credential chain:
/// profile env var → keyring → token cache → plaintext config.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring::Entry::new("spiderweb", &format!("{profile_name}/token")) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    if let Some(cached) = load_session_token(profile_name) {
        return Some(cached);
    }

    profile.token.clone().map(SecretString::from)
}

/// Resolve username + password for the login exchange:
/// env → keyring → plaintext config.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("SPIDERWEB_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    if let Ok(pw) = std::env::var("SPIDERWEB_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    if let Ok(entry) = keyring::Entry::new("spiderweb", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok((username, SecretString::from(pw)));
        }
    }

    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve `AuthCredentials` for a profile: a stored token wins (no login
/// round-trip); otherwise fall back to username + password.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    if let Some(token) = resolve_token(profile, profile_name) {
        return Ok(AuthCredentials::Token(token));
    }

    let (username, password) = resolve_credentials(profile, profile_name)?;
    Ok(AuthCredentials::Credentials { username, password })
}

// ── BackendConfig translation ───────────────────────────────────────

/// Build a `BackendConfig` from a profile.
pub fn profile_to_backend_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<BackendConfig, ConfigError> {
    let url: url::Url = profile
        .backend
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {}", profile.backend),
        })?;

    let auth = resolve_auth(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let alert_poll_interval =
        Duration::from_secs(profile.alert_poll_secs.unwrap_or(defaults.alert_poll_secs));

    Ok(BackendConfig {
        url,
        auth,
        tls,
        timeout,
        alert_poll_interval,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn token_cache_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let token = SecretString::from("tok-123".to_owned());

        assert!(load_token_in(dir.path(), "default").is_none());

        save_token_in(dir.path(), "default", &token).unwrap();
        let loaded = load_token_in(dir.path(), "default").unwrap();
        assert_eq!(loaded.expose_secret(), "tok-123");

        clear_token_in(dir.path(), "default").unwrap();
        assert!(load_token_in(dir.path(), "default").is_none());
    }

    #[test]
    fn clearing_a_missing_token_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        clear_token_in(dir.path(), "nope").unwrap();
    }

    #[test]
    fn profile_translation_validates_the_url() {
        let profile = Profile {
            backend: "not a url".into(),
            token: Some("tok".into()),
            ..Profile::default()
        };
        let result = profile_to_backend_config(&profile, "default", &Defaults::default());
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn plaintext_token_resolves_as_token_auth() {
        let profile = Profile {
            backend: "http://localhost:8000/api".into(),
            token: Some("tok-abc".into()),
            ..Profile::default()
        };
        let config =
            profile_to_backend_config(&profile, "no-such-profile", &Defaults::default()).unwrap();
        assert!(matches!(config.auth, AuthCredentials::Token(_)));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.alert_poll_interval, Duration::from_secs(30));
    }
}
