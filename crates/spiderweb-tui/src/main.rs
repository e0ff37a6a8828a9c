//! `spiderweb-tui` — terminal dashboard for Spiderweb network operations.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `spiderweb-core`'s [`EntityStream`](spiderweb_core::EntityStream).
//! Screens are navigable via number keys (1-4): Dashboard, Topology,
//! End-sites, and Alerts.
//!
//! Logs are written to a file (default `/tmp/spiderweb-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task continuously
//! streams entity updates from the controller into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use spiderweb_core::{AuthCredentials, BackendConfig, Controller, TlsVerification};

use crate::app::App;

/// Terminal dashboard for monitoring the Spiderweb network topology.
#[derive(Parser, Debug)]
#[command(name = "spiderweb-tui", version, about)]
struct Cli {
    /// Backend API root (e.g., http://localhost:8000/api)
    #[arg(short = 'u', long, env = "SPIDERWEB_URL")]
    url: Option<String>,

    /// Session token (falls back to the profile's cached token)
    #[arg(short = 't', long, env = "SPIDERWEB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Config profile to use
    #[arg(short = 'p', long, env = "SPIDERWEB_PROFILE")]
    profile: Option<String>,

    /// Log file path (defaults to /tmp/spiderweb-tui.log)
    #[arg(long, default_value = "/tmp/spiderweb-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spiderweb={log_level}")));

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("spiderweb-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Build a [`Controller`]: CLI flags take priority, then the shared
/// config file's profile.
fn build_controller(cli: &Cli) -> Result<Controller> {
    // Flags alone are enough when both URL and token are given.
    if let (Some(url), Some(token)) = (&cli.url, &cli.token) {
        let config = BackendConfig {
            url: url.parse()?,
            auth: AuthCredentials::Token(SecretString::from(token.clone())),
            tls: TlsVerification::SystemDefaults,
            timeout: std::time::Duration::from_secs(30),
            alert_poll_interval: std::time::Duration::from_secs(30),
        };
        return Ok(Controller::new(config)?);
    }

    // Otherwise resolve through the shared config file.
    let file = spiderweb_config::load_config_or_default();
    let profile_name = cli
        .profile
        .clone()
        .or_else(|| file.default_profile.clone())
        .unwrap_or_else(|| "default".into());
    let mut profile = file
        .profiles
        .get(&profile_name)
        .cloned()
        .unwrap_or_default();

    if let Some(ref url) = cli.url {
        profile.backend = url.clone();
    }
    if let Some(ref token) = cli.token {
        profile.token = Some(token.clone());
    }
    if profile.backend.is_empty() {
        return Err(eyre!(
            "no backend configured: pass --url/--token or run `spiderweb login` first"
        ));
    }

    let config =
        spiderweb_config::profile_to_backend_config(&profile, &profile_name, &file.defaults)
            .map_err(|e| eyre!("{e}"))?;
    Ok(Controller::new(config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(
        url = cli.url.as_deref().unwrap_or("(from profile)"),
        "starting spiderweb-tui"
    );

    let controller = build_controller(&cli)?;
    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
