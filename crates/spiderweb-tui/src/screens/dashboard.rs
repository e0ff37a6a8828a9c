//! Dashboard screen — load status per collection, alert totals, and the
//! most recent alerts. Failed collections render a retry-capable banner.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Row, Table};

use spiderweb_core::{Alert, AlertSeverity, CollectionStatus};

use crate::action::{Action, CollectionKind};
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator;

const STATUS_ROWS: [CollectionKind; 6] = [
    CollectionKind::Networks,
    CollectionKind::CoreSites,
    CollectionKind::CoreDevices,
    CollectionKind::Links,
    CollectionKind::EndSites,
    CollectionKind::Alerts,
];

pub struct DashboardScreen {
    focused: bool,
    counts: [usize; 6],
    statuses: [CollectionStatus; 6],
    alerts: Arc<Vec<Arc<Alert>>>,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            counts: [0; 6],
            statuses: std::array::from_fn(|_| CollectionStatus::Idle),
            alerts: Arc::new(Vec::new()),
        }
    }

    fn slot(kind: CollectionKind) -> usize {
        STATUS_ROWS
            .iter()
            .position(|&k| k == kind)
            .unwrap_or_default()
    }

    /// The first failed collection, for the banner.
    fn first_failure(&self) -> Option<(CollectionKind, &str)> {
        STATUS_ROWS.iter().enumerate().find_map(|(i, &kind)| {
            self.statuses[i].error().map(|msg| (kind, msg))
        })
    }

    fn newest_alerts(&self, limit: usize) -> Vec<Arc<Alert>> {
        let mut alerts: Vec<Arc<Alert>> = self.alerts.iter().map(Arc::clone).collect();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts.truncate(limit);
        alerts
    }

    fn render_statuses(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Data ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let rows: Vec<Row> = STATUS_ROWS
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                Row::new(vec![
                    Line::from(Span::styled(kind.label(), theme::table_row())),
                    Line::from(status_indicator::collection_status_span(&self.statuses[i])),
                    Line::from(Span::styled(
                        self.counts[i].to_string(),
                        theme::table_row(),
                    )),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Length(9),
                Constraint::Min(6),
            ],
        )
        .header(Row::new(vec!["Collection", "Status", "Records"]).style(theme::table_header()))
        .block(block);

        frame.render_widget(table, area);
    }

    fn render_alerts(&self, frame: &mut Frame, area: Rect) {
        let errors = self
            .alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Error)
            .count();
        let warnings = self
            .alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Warning)
            .count();

        let title = format!(
            " Alerts  ·  {} total, {errors} error, {warnings} warning ",
            self.alerts.len()
        );
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner_height = block.inner(area).height as usize;
        let lines: Vec<Line> = self
            .newest_alerts(inner_height)
            .into_iter()
            .map(|a| {
                Line::from(vec![
                    Span::styled(
                        a.timestamp.format("%H:%M:%S ").to_string(),
                        Style::default().fg(theme::FG_DIM),
                    ),
                    status_indicator::severity_span(a.severity),
                    Span::raw(" "),
                    Span::styled(a.message.clone(), theme::table_row()),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            // Retry is only meaningful when something failed.
            KeyCode::Char('r') if self.first_failure().is_some() => Ok(Some(Action::Retry)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::NetworksUpdated(n) => {
                self.counts[Self::slot(CollectionKind::Networks)] = n.len();
            }
            Action::CoreSitesUpdated(s) => {
                self.counts[Self::slot(CollectionKind::CoreSites)] = s.len();
            }
            Action::CoreDevicesUpdated(d) => {
                self.counts[Self::slot(CollectionKind::CoreDevices)] = d.len();
            }
            Action::LinksUpdated(l) => {
                self.counts[Self::slot(CollectionKind::Links)] = l.len();
            }
            Action::EndSitesUpdated(e) => {
                self.counts[Self::slot(CollectionKind::EndSites)] = e.len();
            }
            Action::AlertsUpdated(a) => {
                self.counts[Self::slot(CollectionKind::Alerts)] = a.len();
                self.alerts = Arc::clone(a);
            }
            Action::StatusChanged(kind, status) => {
                self.statuses[Self::slot(*kind)] = status.clone();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        // A failed section gets a scoped banner; everything else renders on.
        let (banner_area, body_area) = if self.first_failure().is_some() {
            let [banner, body] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
            (Some(banner), body)
        } else {
            (None, area)
        };

        if let (Some(banner), Some((kind, message))) = (banner_area, self.first_failure()) {
            let line = Line::from(vec![
                Span::styled(
                    format!(" {} failed: {message}  ", kind.label()),
                    theme::banner_error(),
                ),
                Span::styled("r", theme::key_hint_key()),
                Span::styled(" retry from the top", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), banner);
        }

        let [left, right] =
            Layout::horizontal([Constraint::Length(36), Constraint::Min(20)]).areas(body_area);
        self.render_statuses(frame, left);
        self.render_alerts(frame, right);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Dashboard"
    }
}
