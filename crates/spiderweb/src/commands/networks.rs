//! Network command handlers.

use std::sync::Arc;

use tabled::Tabled;

use spiderweb_core::{Controller, Selectors};

use crate::cli::{GlobalOpts, NetworksArgs, NetworksCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sites")]
    sites: usize,
    #[tabled(rename = "Devices")]
    devices: usize,
    #[tabled(rename = "Links")]
    links: usize,
}

pub fn handle(
    controller: &Controller,
    args: NetworksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NetworksCommand::List => {
            let selectors = Selectors::new(Arc::clone(controller.store()));
            let mut networks: Vec<_> = controller.store().networks_snapshot().to_vec();
            networks.sort_by(|a, b| a.name.cmp(&b.name));

            let out = output::render_list(
                global.output,
                &networks,
                |n| {
                    let sites = selectors.core_sites_for_network(&n.id);
                    let devices: usize = sites
                        .iter()
                        .map(|s| selectors.devices_for_site(&s.id).len())
                        .sum();
                    NetworkRow {
                        id: n.id.to_string(),
                        name: n.name.clone(),
                        sites: sites.len(),
                        devices,
                        links: selectors.links_for_network(&n.id).len(),
                    }
                },
                |n| n.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
