//! Topology screen — canvas graph of one network: core sites as zones,
//! devices as nodes, links as status-colored lines. `n` cycles between
//! networks (the L and P charts are just different selections here);
//! `j`/`k` walk the devices, with a drill-down panel for the selection.

use std::collections::HashMap;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Rectangle};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use spiderweb_core::{CoreDevice, CoreSite, EndSite, EntityId, Link, LinkStatus, Network};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// A positioned device node on the canvas.
struct DeviceNode {
    label: String,
    selected: bool,
    x: f64,
    y: f64,
}

/// A zone (core site) box containing its devices.
struct Zone {
    name: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    devices: Vec<DeviceNode>,
}

/// A drawable link between two positioned endpoints.
struct Edge {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    status: LinkStatus,
}

pub struct TopologyScreen {
    focused: bool,
    networks: Arc<Vec<Arc<Network>>>,
    core_sites: Arc<Vec<Arc<CoreSite>>>,
    core_devices: Arc<Vec<Arc<CoreDevice>>>,
    links: Arc<Vec<Arc<Link>>>,
    end_sites: Arc<Vec<Arc<EndSite>>>,
    selected: usize,
    selected_device: usize,
    pan_x: f64,
    pan_y: f64,
    zoom: f64,
}

impl TopologyScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            networks: Arc::new(Vec::new()),
            core_sites: Arc::new(Vec::new()),
            core_devices: Arc::new(Vec::new()),
            links: Arc::new(Vec::new()),
            end_sites: Arc::new(Vec::new()),
            selected: 0,
            selected_device: 0,
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }

    fn sorted_networks(&self) -> Vec<Arc<Network>> {
        let mut networks: Vec<Arc<Network>> = self.networks.iter().map(Arc::clone).collect();
        networks.sort_by(|a, b| a.name.cmp(&b.name));
        networks
    }

    fn selected_network(&self) -> Option<Arc<Network>> {
        let networks = self.sorted_networks();
        networks.get(self.selected % networks.len().max(1)).cloned()
    }

    /// Devices of the selected network, in stable (site, name) order.
    /// This is the cycling order for the drill-down selection.
    fn network_devices(&self) -> Vec<Arc<CoreDevice>> {
        let Some(network) = self.selected_network() else {
            return Vec::new();
        };
        let mut sites: Vec<&Arc<CoreSite>> = self
            .core_sites
            .iter()
            .filter(|s| s.network_id == network.id)
            .collect();
        sites.sort_by(|a, b| a.name.cmp(&b.name));

        let mut devices = Vec::new();
        for site in sites {
            let mut at_site: Vec<Arc<CoreDevice>> = self
                .core_devices
                .iter()
                .filter(|d| d.core_site_id == site.id)
                .map(Arc::clone)
                .collect();
            at_site.sort_by(|a, b| a.name.cmp(&b.name));
            devices.extend(at_site);
        }
        devices
    }

    fn drilldown_device(&self) -> Option<Arc<CoreDevice>> {
        let devices = self.network_devices();
        devices
            .get(self.selected_device % devices.len().max(1))
            .cloned()
    }

    /// Lay out the selected network: one zone column per core site,
    /// devices stacked inside, links as lines between device centers.
    fn build_layout(&self) -> (Vec<Zone>, Vec<Edge>) {
        let Some(network) = self.selected_network() else {
            return (Vec::new(), Vec::new());
        };

        let mut sites: Vec<&Arc<CoreSite>> = self
            .core_sites
            .iter()
            .filter(|s| s.network_id == network.id)
            .collect();
        sites.sort_by(|a, b| a.name.cmp(&b.name));

        let drilldown = self.drilldown_device();
        let columns = sites.len().max(1);
        #[allow(clippy::cast_precision_loss)]
        let zone_width = 90.0 / columns as f64;

        let mut zones = Vec::new();
        let mut positions: HashMap<EntityId, (f64, f64)> = HashMap::new();

        for (col, site) in sites.iter().enumerate() {
            let mut devices: Vec<&Arc<CoreDevice>> = self
                .core_devices
                .iter()
                .filter(|d| d.core_site_id == site.id)
                .collect();
            devices.sort_by(|a, b| a.name.cmp(&b.name));

            #[allow(clippy::cast_precision_loss)]
            let zone_x = 5.0 + col as f64 * zone_width;
            let zone = Zone {
                name: site.name.clone(),
                x: zone_x,
                y: 15.0,
                width: zone_width - 4.0,
                height: 70.0,
                devices: devices
                    .iter()
                    .enumerate()
                    .map(|(row, d)| {
                        #[allow(clippy::cast_precision_loss)]
                        let step = 70.0 / (devices.len() + 1) as f64;
                        #[allow(clippy::cast_precision_loss)]
                        let y = 85.0 - (row + 1) as f64 * step;
                        let x = zone_x + (zone_width - 4.0) / 2.0;
                        positions.insert(d.id.clone(), (x, y));
                        DeviceNode {
                            label: d.name.clone(),
                            selected: drilldown.as_ref().is_some_and(|sel| sel.id == d.id),
                            x,
                            y,
                        }
                    })
                    .collect(),
            };
            zones.push(zone);
        }

        let mut edges = Vec::new();
        for link in self.links.iter() {
            let source = positions.get(&link.source);
            let target = positions.get(&link.target);
            match (source, target) {
                // Trunk between two placed devices.
                (Some(&(x1, y1)), Some(&(x2, y2))) => edges.push(Edge {
                    x1,
                    y1,
                    x2,
                    y2,
                    status: link.status,
                }),
                // Access link: drawn as a stub hanging below the device.
                (Some(&(x, y)), None) | (None, Some(&(x, y))) => edges.push(Edge {
                    x1: x,
                    y1: y,
                    x2: x + 2.0,
                    y2: y - 8.0,
                    status: link.status,
                }),
                (None, None) => {}
            }
        }

        (zones, edges)
    }

    fn status_color(status: LinkStatus) -> Color {
        match status {
            LinkStatus::Up => theme::STATUS_UP,
            LinkStatus::Down => theme::STATUS_DOWN,
            LinkStatus::Issue => theme::STATUS_ISSUE,
        }
    }

    /// Display label for the far end of a link: device name, end-site
    /// name, or the bare id.
    fn endpoint_label(&self, id: &EntityId) -> String {
        if let Some(device) = self.core_devices.iter().find(|d| &d.id == id) {
            return device.name.clone();
        }
        if let Some(end_site) = self.end_sites.iter().find(|e| &e.id == id) {
            return end_site.site_name_english.clone();
        }
        id.to_string()
    }

    /// Drill-down panel for the selected device: identity, its links with
    /// statuses, and the end-sites it serves.
    fn render_drilldown(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Device ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let Some(device) = self.drilldown_device() else {
            frame.render_widget(
                Paragraph::new("no devices").style(theme::key_hint()).block(block),
                area,
            );
            return;
        };

        let site_name = self
            .core_sites
            .iter()
            .find(|s| s.id == device.core_site_id)
            .map_or_else(|| device.core_site_id.to_string(), |s| s.name.clone());

        let mut lines = vec![
            Line::from(Span::styled(device.name.clone(), theme::tab_active())),
            Line::from(vec![
                Span::styled("site ", theme::key_hint()),
                Span::styled(site_name, theme::table_row()),
            ]),
            Line::from(vec![
                Span::styled("ip   ", theme::key_hint()),
                Span::styled(
                    device
                        .ip_address
                        .map(|ip| ip.to_string())
                        .unwrap_or_else(|| "-".into()),
                    theme::table_row(),
                ),
            ]),
            Line::default(),
            Line::from(Span::styled("Links", theme::table_header())),
        ];

        let mut attached: Vec<&Arc<Link>> = self
            .links
            .iter()
            .filter(|l| l.source == device.id || l.target == device.id)
            .collect();
        attached.sort_by_key(|l| l.id.to_string());
        if attached.is_empty() {
            lines.push(Line::from(Span::styled("  none", theme::key_hint())));
        }
        for link in attached {
            let far_end = if link.source == device.id {
                &link.target
            } else {
                &link.source
            };
            lines.push(Line::from(vec![
                Span::styled("  ● ", Style::default().fg(Self::status_color(link.status))),
                Span::styled(self.endpoint_label(far_end), theme::table_row()),
                Span::styled(
                    link.bandwidth
                        .as_deref()
                        .map_or_else(String::new, |b| format!("  {b}")),
                    theme::key_hint(),
                ),
            ]));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled("End-sites", theme::table_header())));
        let mut served: Vec<&Arc<EndSite>> = self
            .end_sites
            .iter()
            .filter(|e| e.device_id == device.id)
            .collect();
        served.sort_by(|a, b| a.site_name_english.cmp(&b.site_name_english));
        if served.is_empty() {
            lines.push(Line::from(Span::styled("  none", theme::key_hint())));
        }
        for end_site in served {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", end_site.site_name_english), theme::table_row()),
                Span::styled(
                    end_site
                        .interface_id
                        .as_deref()
                        .map_or_else(String::new, |i| format!("  {i}")),
                    theme::key_hint(),
                ),
            ]));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component for TopologyScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('n') => Ok(Some(Action::CycleNetwork)),
            // Device drill-down selection
            KeyCode::Char('j') => Ok(Some(Action::ScrollDown)),
            KeyCode::Char('k') => Ok(Some(Action::ScrollUp)),
            // Pan
            KeyCode::Left => {
                self.pan_x -= 5.0;
                Ok(Some(Action::TopologyPan(-5, 0)))
            }
            KeyCode::Right => {
                self.pan_x += 5.0;
                Ok(Some(Action::TopologyPan(5, 0)))
            }
            KeyCode::Up => {
                self.pan_y += 5.0;
                Ok(Some(Action::TopologyPan(0, 5)))
            }
            KeyCode::Down => {
                self.pan_y -= 5.0;
                Ok(Some(Action::TopologyPan(0, -5)))
            }
            // Zoom
            KeyCode::Char('+' | '=') => {
                self.zoom = (self.zoom * 1.2).min(5.0);
                Ok(Some(Action::TopologyZoom(self.zoom)))
            }
            KeyCode::Char('-') => {
                self.zoom = (self.zoom / 1.2).max(0.2);
                Ok(Some(Action::TopologyZoom(self.zoom)))
            }
            // Reset
            KeyCode::Char('0') => {
                self.pan_x = 0.0;
                self.pan_y = 0.0;
                self.zoom = 1.0;
                Ok(Some(Action::TopologyReset))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::NetworksUpdated(n) => self.networks = Arc::clone(n),
            Action::CoreSitesUpdated(s) => self.core_sites = Arc::clone(s),
            Action::CoreDevicesUpdated(d) => self.core_devices = Arc::clone(d),
            Action::LinksUpdated(l) => self.links = Arc::clone(l),
            Action::EndSitesUpdated(e) => self.end_sites = Arc::clone(e),
            Action::CycleNetwork => {
                let count = self.networks.len().max(1);
                self.selected = (self.selected + 1) % count;
                self.selected_device = 0;
            }
            Action::ScrollDown => {
                let count = self.network_devices().len().max(1);
                self.selected_device = (self.selected_device + 1) % count;
            }
            Action::ScrollUp => {
                let count = self.network_devices().len().max(1);
                self.selected_device = (self.selected_device + count - 1) % count;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let network_name = self
            .selected_network()
            .map_or_else(|| "—".into(), |n| n.name.clone());
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let zoom_pct = (self.zoom * 100.0) as u32;
        let title = format!(" Topology  ·  Network {network_name}  ·  Zoom {zoom_pct}% ");

        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [graph_area, detail_area] =
            Layout::horizontal([Constraint::Min(40), Constraint::Length(32)]).areas(inner);

        let content_area = Rect {
            x: graph_area.x,
            y: graph_area.y,
            width: graph_area.width,
            height: graph_area.height.saturating_sub(1),
        };
        let hints_area = Rect {
            x: graph_area.x,
            y: graph_area.y + graph_area.height.saturating_sub(1),
            width: graph_area.width,
            height: 1,
        };

        let (zones, edges) = self.build_layout();

        // Canvas bounds with zoom and pan
        let x_min = -5.0 / self.zoom + self.pan_x;
        let x_max = 105.0 / self.zoom + self.pan_x;
        let y_min = -5.0 / self.zoom + self.pan_y;
        let y_max = 105.0 / self.zoom + self.pan_y;

        let canvas = Canvas::default()
            .x_bounds([x_min, x_max])
            .y_bounds([y_min, y_max])
            .paint(|ctx: &mut Context<'_>| {
                // Links first so nodes draw over them.
                for edge in &edges {
                    ctx.draw(&ratatui::widgets::canvas::Line {
                        x1: edge.x1,
                        y1: edge.y1,
                        x2: edge.x2,
                        y2: edge.y2,
                        color: Self::status_color(edge.status),
                    });
                }

                for zone in &zones {
                    ctx.draw(&Rectangle {
                        x: zone.x,
                        y: zone.y,
                        width: zone.width,
                        height: zone.height,
                        color: theme::BORDER_GRAY,
                    });
                    ctx.print(
                        zone.x + 1.0,
                        zone.y + zone.height + 2.0,
                        Span::styled(
                            zone.name.clone(),
                            Style::default().fg(theme::ACCENT_TEAL),
                        ),
                    );

                    for device in &zone.devices {
                        let marker_color = if device.selected {
                            theme::STATUS_ISSUE
                        } else {
                            theme::ACCENT_BLUE
                        };
                        ctx.print(
                            device.x - 1.0,
                            device.y,
                            Span::styled("◼", Style::default().fg(marker_color)),
                        );
                        let label: String = device.label.chars().take(14).collect();
                        let label_style = if device.selected {
                            theme::tab_active()
                        } else {
                            theme::table_row()
                        };
                        ctx.print(device.x - 1.0, device.y - 3.0, Span::styled(label, label_style));
                    }
                }
            });

        frame.render_widget(canvas, content_area);

        let hints = Line::from(vec![
            Span::styled("  n ", theme::key_hint_key()),
            Span::styled("network  ", theme::key_hint()),
            Span::styled("j/k ", theme::key_hint_key()),
            Span::styled("device  ", theme::key_hint()),
            Span::styled("←→↑↓ ", theme::key_hint_key()),
            Span::styled("pan  ", theme::key_hint()),
            Span::styled("+/- ", theme::key_hint_key()),
            Span::styled("zoom  ", theme::key_hint()),
            Span::styled("0 ", theme::key_hint_key()),
            Span::styled("reset", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);

        self.render_drilldown(frame, detail_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Topology"
    }
}
