//! End-sites screen — branch sites grouped by English name, with their
//! uplink device and interface.

use std::collections::BTreeMap;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Row, Table, TableState};

use spiderweb_core::{CoreDevice, EndSite, EntityId};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct EndSitesScreen {
    focused: bool,
    end_sites: Arc<Vec<Arc<EndSite>>>,
    core_devices: Arc<Vec<Arc<CoreDevice>>>,
    selected: usize,
}

impl EndSitesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            end_sites: Arc::new(Vec::new()),
            core_devices: Arc::new(Vec::new()),
            selected: 0,
        }
    }

    /// Rows grouped by English site name, keeping connection order stable.
    fn grouped(&self) -> Vec<Arc<EndSite>> {
        let mut by_name: BTreeMap<(String, String), Vec<Arc<EndSite>>> = BTreeMap::new();
        for site in self.end_sites.iter() {
            by_name
                .entry((site.site_name_english.clone(), site.id.to_string()))
                .or_default()
                .push(Arc::clone(site));
        }
        by_name.into_values().flatten().collect()
    }

    fn device_name(&self, id: &EntityId) -> String {
        self.core_devices
            .iter()
            .find(|d| &d.id == id)
            .map_or_else(|| id.to_string(), |d| d.name.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.end_sites.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

impl Component for EndSitesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Ok(Some(Action::ScrollUp)),
            KeyCode::Down | KeyCode::Char('j') => Ok(Some(Action::ScrollDown)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::EndSitesUpdated(sites) => {
                self.end_sites = Arc::clone(sites);
                self.clamp_selection();
            }
            Action::CoreDevicesUpdated(devices) => {
                self.core_devices = Arc::clone(devices);
            }
            Action::ScrollUp => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::ScrollDown => {
                self.selected += 1;
                self.clamp_selection();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows_data = self.grouped();
        let title = format!(" End-sites  ·  {} connections ", rows_data.len());

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

        let rows: Vec<Row> = rows_data
            .iter()
            .map(|e| {
                Row::new(vec![
                    Line::from(Span::styled(e.id.to_string(), Style::default().fg(theme::FG_DIM))),
                    Line::from(Span::styled(e.site_name_english.clone(), theme::table_row())),
                    Line::from(Span::styled(
                        e.site_name_hebrew.clone(),
                        Style::default().fg(theme::ACCENT_TEAL),
                    )),
                    Line::from(Span::styled(
                        self.device_name(&e.device_id),
                        theme::table_row(),
                    )),
                    Line::from(Span::styled(
                        e.interface_id.clone().unwrap_or_default(),
                        Style::default().fg(theme::FG_DIM),
                    )),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Min(18),
                Constraint::Min(14),
                Constraint::Length(16),
                Constraint::Length(12),
            ],
        )
        .header(
            Row::new(vec!["ID", "Site", "שם", "Device", "Interface"])
                .style(theme::table_header()),
        )
        .row_highlight_style(theme::table_selected())
        .block(block);

        let mut state = TableState::default();
        state.select(if rows_data.is_empty() {
            None
        } else {
            Some(self.selected.min(rows_data.len() - 1))
        });
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "End-sites"
    }
}
