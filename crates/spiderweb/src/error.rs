//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use spiderweb_core::CoreError;

/// Exit codes for scripting against the CLI.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(spiderweb::connection_failed),
        help(
            "Check that the backend is running and accessible.\n\
             URL: {url}\n\
             Override it with --url or the SPIDERWEB_URL variable."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(spiderweb::auth_failed),
        help("Run: spiderweb login --profile {profile}")
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(spiderweb::no_credentials),
        help(
            "Run: spiderweb login\n\
             Or set the SPIDERWEB_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(spiderweb::not_found),
        help("Run: spiderweb {list_command} to see available entries")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(code(spiderweb::config))]
    Config { message: String },

    // ── Backend / misc ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(spiderweb::backend))]
    Backend { message: String },

    #[error("{0}")]
    #[diagnostic(code(spiderweb::other))]
    Other(String),
}

impl CliError {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            _ => exit_code::GENERAL,
        }
    }

    /// Wrap a `CoreError`, attaching the active profile for help text.
    pub fn from_core(err: CoreError, profile: &str) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed {
                profile: profile.to_owned(),
                message,
            },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => {
                let list_command = match entity_type.as_str() {
                    "alert" => "alerts list",
                    "network" => "networks list",
                    "core site" => "sites list",
                    "core device" => "devices list",
                    "end-site" => "endsites list",
                    _ => "networks list",
                };
                Self::NotFound {
                    resource_type: entity_type,
                    identifier,
                    list_command: list_command.into(),
                }
            }
            CoreError::Config { message } => Self::Config { message },
            CoreError::Api { message, .. } | CoreError::OperationFailed { message } => {
                Self::Backend { message }
            }
            CoreError::Internal(message) => Self::Other(message),
        }
    }
}

impl From<spiderweb_config::ConfigError> for CliError {
    fn from(err: spiderweb_config::ConfigError) -> Self {
        match err {
            spiderweb_config::ConfigError::NoCredentials { profile } => {
                Self::NoCredentials { profile }
            }
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
