//! Alert command handlers.

use std::sync::Arc;

use tabled::Tabled;

use spiderweb_core::{Command, CommandResult, Controller, EntityId, Selectors};

use crate::cli::{AlertsArgs, AlertsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Line")]
    line: String,
    #[tabled(rename = "★")]
    favorite: String,
}

pub async fn handle(
    controller: &Controller,
    args: AlertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color =
        output::should_color(global.color) && global.output == crate::cli::OutputFormat::Table;

    match args.command {
        AlertsCommand::List {
            severity,
            favorites,
        } => {
            let selectors = Selectors::new(Arc::clone(controller.store()));
            let alerts = selectors.filtered_alerts(severity, favorites);

            let out = output::render_list(
                global.output,
                &alerts,
                |a| AlertRow {
                    time: a.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    severity: output::severity(a.severity, color),
                    message: a.message.clone(),
                    line: a.network_line.clone().unwrap_or_default(),
                    favorite: if a.is_favorite { "★" } else { "" }.into(),
                },
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);

            if !global.quiet && global.output == crate::cli::OutputFormat::Table {
                let counts = selectors.alert_counts();
                println!(
                    "{} alerts ({} error, {} warning, {} info)",
                    counts.total(),
                    counts.error,
                    counts.warning,
                    counts.info
                );
            }
            Ok(())
        }

        AlertsCommand::Favorite { id } => {
            let entity_id: EntityId = id.as_str().into();
            let result = controller
                .execute(Command::ToggleAlertFavorite { id: entity_id })
                .await
                .map_err(|e| CliError::from_core(e, ""))?;

            if let CommandResult::Favorite { id, is_favorite } = result {
                if !global.quiet {
                    let state = if is_favorite { "favorited" } else { "unfavorited" };
                    println!("Alert {id} {state}.");
                }
            }
            Ok(())
        }
    }
}
