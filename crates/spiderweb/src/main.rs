//! `spiderweb` — command-line console for the Spiderweb NOC backend.
//!
//! Entry point: argument parsing, tracing setup, session resolution, and
//! command dispatch. Data commands run the controller in oneshot mode
//! (connect, fetch, print, exit); `login`/`logout`/`config` never touch
//! the backend's data surface.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use spiderweb_core::Controller;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

fn init_tracing() {
    // Logs go to stderr so stdout stays clean for piped output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Commands that never load topology data.
        Commands::Login(args) => commands::auth::login(&cli.global, args).await,
        Commands::Logout => commands::auth::logout(&cli.global),
        Commands::Config(args) => commands::config_cmd::handle(&cli.global, args),

        // Data commands: oneshot session, then dispatch.
        command => {
            let session = config::resolve(&cli.global)?;
            let controller = Controller::oneshot(session.config.clone())
                .await
                .map_err(|e| CliError::from_core(e, &session.profile_name))?;

            let result = match command {
                Commands::Networks(args) => {
                    commands::networks::handle(&controller, args, &cli.global)
                }
                Commands::Sites(args) => {
                    commands::sites::handle(&controller, args, &cli.global).await
                }
                Commands::Devices(args) => {
                    commands::devices::handle(&controller, args, &cli.global).await
                }
                Commands::Links(args) => commands::links::handle(&controller, args, &cli.global),
                Commands::Endsites(args) => {
                    commands::endsites::handle(&controller, args, &cli.global)
                }
                Commands::Alerts(args) => {
                    commands::alerts::handle(&controller, args, &cli.global).await
                }
                Commands::Topology(args) => {
                    commands::topology::handle(&controller, args, &cli.global)
                }
                Commands::Login(_) | Commands::Logout | Commands::Config(_) => unreachable!(),
            };
            result.map_err(|e| match e {
                CliError::AuthFailed { message, .. } => CliError::AuthFailed {
                    profile: session.profile_name.clone(),
                    message,
                },
                other => other,
            })
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        let report = miette::Report::new(err);
        eprintln!("{report:?}");
        std::process::exit(code);
    }
}
