//! Core-site command handlers.

use std::sync::Arc;

use tabled::Tabled;

use spiderweb_core::{Command, Controller, CoreSite, CreateCoreSiteRequest, Selectors};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Devices")]
    devices: usize,
}

pub async fn handle(
    controller: &Controller,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = controller.store();

    match args.command {
        SitesCommand::List { network } => {
            let selectors = Selectors::new(Arc::clone(store));

            let sites: Vec<Arc<CoreSite>> = match network {
                Some(ref needle) => {
                    let network = util::resolve_network(store, needle)?;
                    selectors.core_sites_for_network(&network.id).to_vec()
                }
                None => {
                    let mut all = store.core_sites_snapshot().to_vec();
                    all.sort_by(|a, b| a.name.cmp(&b.name));
                    all
                }
            };

            let out = output::render_list(
                global.output,
                &sites,
                |s| SiteRow {
                    id: s.id.to_string(),
                    name: s.name.clone(),
                    network: store
                        .network_by_id(&s.network_id)
                        .map_or_else(|| s.network_id.to_string(), |n| n.name.clone()),
                    devices: selectors.devices_for_site(&s.id).len(),
                },
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Add { name, network } => {
            let network = util::resolve_network(store, &network)?;
            controller
                .execute(Command::AddCoreSite(CreateCoreSiteRequest {
                    name: name.clone(),
                    network_id: network.id.clone(),
                }))
                .await
                .map_err(|e| CliError::from_core(e, ""))?;
            if !global.quiet {
                println!("Created core site '{name}' under network '{}'.", network.name);
            }
            Ok(())
        }

        SitesCommand::Delete { id } => {
            let site = util::resolve_site(store, &id)?;
            controller
                .execute(Command::DeleteCoreSite {
                    id: site.id.clone(),
                    network_id: site.network_id.clone(),
                })
                .await
                .map_err(|e| CliError::from_core(e, ""))?;
            if !global.quiet {
                println!("Deleted core site '{}'.", site.name);
            }
            Ok(())
        }
    }
}
