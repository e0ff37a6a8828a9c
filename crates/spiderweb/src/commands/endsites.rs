//! End-site command handlers.

use std::sync::Arc;

use tabled::Tabled;

use spiderweb_core::{Controller, EndSite, EntityId, Selectors};

use crate::cli::{EndsitesArgs, EndsitesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct EndSiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "שם")]
    hebrew: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Interface")]
    interface: String,
}

fn detail(store: &spiderweb_core::DataStore, e: &Arc<EndSite>) -> String {
    [
        format!("ID:        {}", e.id),
        format!("Site:      {}", e.site_name_english),
        format!("שם:        {}", e.site_name_hebrew),
        format!("Device:    {}", util::endpoint_label(store, &e.device_id)),
        format!("Interface: {}", e.interface_id.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub fn handle(
    controller: &Controller,
    args: EndsitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = controller.store();
    let selectors = Selectors::new(Arc::clone(store));

    match args.command {
        EndsitesCommand::List { device } => {
            let sites: Vec<Arc<EndSite>> = match device {
                Some(ref needle) => {
                    let device = util::resolve_device(store, needle)?;
                    selectors.end_sites_for_device(&device.id).to_vec()
                }
                None => selectors
                    .end_site_groups()
                    .iter()
                    .flat_map(|g| g.sites.clone())
                    .collect(),
            };

            let out = output::render_list(
                global.output,
                &sites,
                |e| EndSiteRow {
                    id: e.id.to_string(),
                    site: e.site_name_english.clone(),
                    hebrew: e.site_name_hebrew.clone(),
                    device: util::endpoint_label(store, &e.device_id),
                    interface: e.interface_id.clone().unwrap_or_default(),
                },
                |e| e.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EndsitesCommand::Get { id } => {
            let entity_id: EntityId = id.as_str().into();
            let Some(end_site) = store.end_site_by_id(&entity_id) else {
                return Err(CliError::NotFound {
                    resource_type: "end-site".into(),
                    identifier: id,
                    list_command: "endsites list".into(),
                });
            };
            let out = output::render_single(
                global.output,
                &end_site,
                |e| detail(store, e),
                |e| e.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
