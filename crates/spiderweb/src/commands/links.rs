//! Link command handlers.

use std::sync::Arc;

use tabled::Tabled;

use spiderweb_core::{Controller, Link, Selectors};

use crate::cli::{GlobalOpts, LinksArgs, LinksCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Bandwidth")]
    bandwidth: String,
    #[tabled(rename = "Kind")]
    kind: String,
}

pub fn handle(
    controller: &Controller,
    args: LinksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = controller.store();
    let color = output::should_color(global.color) && global.output == crate::cli::OutputFormat::Table;

    match args.command {
        LinksCommand::List {
            network,
            device,
            status,
            kind,
        } => {
            let mut links: Vec<Arc<Link>> = match network {
                Some(ref needle) => {
                    let network = util::resolve_network(store, needle)?;
                    let selectors = Selectors::new(Arc::clone(store));
                    selectors.links_for_network(&network.id).to_vec()
                }
                None => {
                    let mut all = store.links_snapshot().to_vec();
                    all.sort_by_key(|l| l.id.to_string());
                    all
                }
            };

            if let Some(ref needle) = device {
                let device = util::resolve_device(store, needle)?;
                links.retain(|l| l.source == device.id || l.target == device.id);
            }
            if let Some(status) = status {
                links.retain(|l| l.status == status);
            }
            if let Some(kind) = kind {
                links.retain(|l| l.kind == kind);
            }

            let out = output::render_list(
                global.output,
                &links,
                |l| LinkRow {
                    id: l.id.to_string(),
                    source: util::endpoint_label(store, &l.source),
                    target: util::endpoint_label(store, &l.target),
                    status: output::link_status(l.status, color),
                    bandwidth: l.bandwidth.clone().unwrap_or_default(),
                    kind: l.kind.to_string(),
                },
                |l| l.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
