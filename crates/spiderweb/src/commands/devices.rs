//! Core-device command handlers.

use std::sync::Arc;

use tabled::Tabled;

use spiderweb_core::{Command, Controller, CoreDevice, CreateCoreDeviceRequest, Selectors};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "End-sites")]
    end_sites: usize,
}

pub async fn handle(
    controller: &Controller,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = controller.store();

    match args.command {
        DevicesCommand::List { site } => {
            let selectors = Selectors::new(Arc::clone(store));

            let devices: Vec<Arc<CoreDevice>> = match site {
                Some(ref needle) => {
                    let site = util::resolve_site(store, needle)?;
                    selectors.devices_for_site(&site.id).to_vec()
                }
                None => {
                    let mut all = store.core_devices_snapshot().to_vec();
                    all.sort_by(|a, b| a.name.cmp(&b.name));
                    all
                }
            };

            let out = output::render_list(
                global.output,
                &devices,
                |d| DeviceRow {
                    id: d.id.to_string(),
                    name: d.name.clone(),
                    ip: d.ip_address.map(|ip| ip.to_string()).unwrap_or_default(),
                    site: store
                        .core_site_by_id(&d.core_site_id)
                        .map_or_else(|| d.core_site_id.to_string(), |s| s.name.clone()),
                    end_sites: selectors.end_sites_for_device(&d.id).len(),
                },
                |d| d.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add { name, site, ip } => {
            let site = util::resolve_site(store, &site)?;
            controller
                .execute(Command::AddCoreDevice(CreateCoreDeviceRequest {
                    name: name.clone(),
                    ip_address: ip,
                    core_site_id: site.id.clone(),
                }))
                .await
                .map_err(|e| CliError::from_core(e, ""))?;
            if !global.quiet {
                println!("Created core device '{name}' at site '{}'.", site.name);
            }
            Ok(())
        }

        DevicesCommand::Delete { id } => {
            let device = util::resolve_device(store, &id)?;
            controller
                .execute(Command::DeleteCoreDevice {
                    id: device.id.clone(),
                    core_site_id: device.core_site_id.clone(),
                })
                .await
                .map_err(|e| CliError::from_core(e, ""))?;
            if !global.quiet {
                println!("Deleted core device '{}'.", device.name);
            }
            Ok(())
        }
    }
}
