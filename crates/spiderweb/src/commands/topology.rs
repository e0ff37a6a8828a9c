//! Topology rendering: one network's zones, devices, and links as text.

use std::collections::BTreeMap;
use std::sync::Arc;

use spiderweb_core::{Controller, EntityId, Selectors, TopologyGraph};

use crate::cli::{GlobalOpts, OutputFormat, TopologyArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(
    controller: &Controller,
    args: TopologyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = controller.store();

    let network = match args.network {
        Some(ref needle) => util::resolve_network(store, needle)?,
        None => {
            let mut networks = store.networks_snapshot().to_vec();
            networks.sort_by(|a, b| a.name.cmp(&b.name));
            networks.into_iter().next().ok_or_else(|| CliError::NotFound {
                resource_type: "network".into(),
                identifier: "(any)".into(),
                list_command: "networks list".into(),
            })?
        }
    };

    let selectors = Selectors::new(Arc::clone(store));
    let graph = selectors.topology_graph(&network.id);

    match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            let out = output::render_single(global.output, &*graph, |_| String::new(), |_| {
                String::new()
            });
            output::print_output(&out, global.quiet);
        }
        OutputFormat::Plain => {
            let out = graph
                .nodes
                .iter()
                .map(|n| n.id.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            output::print_output(&out, global.quiet);
        }
        OutputFormat::Table => {
            let color = output::should_color(global.color);
            output::print_output(&render_text(store, &network.name, &graph, color), global.quiet);
        }
    }
    Ok(())
}

/// Tree-style rendering: zones, their devices, and each device's links.
fn render_text(
    store: &spiderweb_core::DataStore,
    network_name: &str,
    graph: &TopologyGraph,
    color: bool,
) -> String {
    let mut zones: BTreeMap<&str, Vec<(&EntityId, &str)>> = BTreeMap::new();
    for node in &graph.nodes {
        zones
            .entry(node.zone.as_str())
            .or_default()
            .push((&node.id, node.name.as_str()));
    }

    let mut lines = vec![format!(
        "Network {network_name} — {} zones, {} devices, {} links",
        zones.len(),
        graph.nodes.len(),
        graph.links.len()
    )];

    for (zone, devices) in &zones {
        lines.push((*zone).to_owned());
        for &(device_id, device_name) in devices {
            lines.push(format!("  ● {device_name}"));

            let attached: Vec<_> = graph
                .links
                .iter()
                .filter(|l| &l.source == device_id || &l.target == device_id)
                .collect();
            for (i, link) in attached.iter().enumerate() {
                let far_end = if &link.source == device_id {
                    &link.target
                } else {
                    &link.source
                };
                let branch = if i + 1 == attached.len() {
                    "└─"
                } else {
                    "├─"
                };
                lines.push(format!(
                    "    {branch} {:5} → {}",
                    output::link_status(link.status, color),
                    util::endpoint_label(store, far_end),
                ));
            }
        }
    }

    lines.join("\n")
}
