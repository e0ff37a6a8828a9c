//! GlobalOpts → profile → `BackendConfig` resolution.
//!
//! Flag > environment > profile > defaults, matching the precedence the
//! help text documents.

use spiderweb_config::{Config, Profile};
use spiderweb_core::BackendConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// A resolved session: the backend config plus the profile it came from.
pub struct Session {
    pub config: BackendConfig,
    pub profile_name: String,
}

/// Pick the active profile name: `--profile` > config `default_profile`.
pub fn profile_name(global: &GlobalOpts, file: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| file.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The active profile with CLI-flag overrides applied.
pub fn effective_profile(global: &GlobalOpts, file: &Config, name: &str) -> Profile {
    let mut profile = file.profiles.get(name).cloned().unwrap_or_default();

    if let Some(ref url) = global.url {
        profile.backend = url.clone();
    }
    if let Some(ref token) = global.token {
        profile.token = Some(token.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    profile
}

/// Resolve the full session for data commands.
pub fn resolve(global: &GlobalOpts) -> Result<Session, CliError> {
    let file = spiderweb_config::load_config_or_default();
    let name = profile_name(global, &file);
    let profile = effective_profile(global, &file, &name);

    if profile.backend.is_empty() {
        return Err(CliError::Config {
            message: format!(
                "no backend URL configured for profile '{name}' -- pass --url or run `spiderweb login --url <url>`"
            ),
        });
    }

    let config = spiderweb_config::profile_to_backend_config(&profile, &name, &file.defaults)?;
    Ok(Session {
        config,
        profile_name: name,
    })
}
