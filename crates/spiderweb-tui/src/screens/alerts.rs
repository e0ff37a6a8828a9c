//! Alerts screen — severity filters, favorites, and per-alert pinning.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Row, Table, TableState};

use spiderweb_core::{Alert, AlertSeverity};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator;

pub struct AlertsScreen {
    focused: bool,
    alerts: Arc<Vec<Arc<Alert>>>,
    severity_filter: Option<AlertSeverity>,
    favorites_only: bool,
    selected: usize,
}

impl AlertsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            alerts: Arc::new(Vec::new()),
            severity_filter: None,
            favorites_only: false,
            selected: 0,
        }
    }

    /// Visible alerts after filtering, newest first.
    fn visible(&self) -> Vec<Arc<Alert>> {
        let mut alerts: Vec<Arc<Alert>> = self
            .alerts
            .iter()
            .filter(|a| self.severity_filter.is_none_or(|s| a.severity == s))
            .filter(|a| !self.favorites_only || a.is_favorite)
            .map(Arc::clone)
            .collect();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn filter_label(&self) -> String {
        let severity = match self.severity_filter {
            Some(s) => s.to_string(),
            None => "all".into(),
        };
        if self.favorites_only {
            format!("{severity} ★")
        } else {
            severity
        }
    }
}

impl Component for AlertsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Ok(Some(Action::ScrollUp)),
            KeyCode::Down | KeyCode::Char('j') => Ok(Some(Action::ScrollDown)),
            KeyCode::Char('e') => Ok(Some(Action::FilterSeverity(Some(AlertSeverity::Error)))),
            KeyCode::Char('w') => Ok(Some(Action::FilterSeverity(Some(AlertSeverity::Warning)))),
            KeyCode::Char('i') => Ok(Some(Action::FilterSeverity(Some(AlertSeverity::Info)))),
            KeyCode::Char('a') => Ok(Some(Action::FilterSeverity(None))),
            KeyCode::Char('F') => Ok(Some(Action::ToggleFavoritesOnly)),
            KeyCode::Char('f') => {
                let toggled = self
                    .visible()
                    .get(self.selected)
                    .map(|a| Action::ToggleFavorite(a.id.clone()));
                Ok(toggled)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AlertsUpdated(alerts) => {
                self.alerts = Arc::clone(alerts);
                self.clamp_selection();
            }
            Action::FilterSeverity(filter) => {
                self.severity_filter = *filter;
                self.selected = 0;
            }
            Action::ToggleFavoritesOnly => {
                self.favorites_only = !self.favorites_only;
                self.selected = 0;
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
        let visible = self.visible();
        let title = format!(" Alerts  ·  {}  ·  {} shown ", self.filter_label(), visible.len());

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
        let table_area = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let hints_area = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1,
            ..inner
        };
        frame.render_widget(block, area);

        let rows: Vec<Row> = visible
            .iter()
            .map(|a| {
                Row::new(vec![
                    Line::from(Span::styled(
                        a.timestamp.format("%m-%d %H:%M:%S").to_string(),
                        Style::default().fg(theme::FG_DIM),
                    )),
                    Line::from(status_indicator::severity_span(a.severity)),
                    Line::from(Span::styled(a.message.clone(), theme::table_row())),
                    Line::from(Span::styled(
                        a.network_line.clone().unwrap_or_default(),
                        Style::default().fg(theme::FG_DIM),
                    )),
                    Line::from(Span::styled(
                        if a.is_favorite { "★" } else { "" },
                        Style::default().fg(theme::STATUS_ISSUE),
                    )),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Length(6),
                Constraint::Min(24),
                Constraint::Length(12),
                Constraint::Length(2),
            ],
        )
        .header(Row::new(vec!["Time", "Sev", "Message", "Line", "★"]).style(theme::table_header()))
        .row_highlight_style(theme::table_selected());

        let mut state = TableState::default();
        state.select(if visible.is_empty() {
            None
        } else {
            Some(self.selected)
        });
        frame.render_stateful_widget(table, table_area, &mut state);

        let hints = Line::from(vec![
            Span::styled(" e/w/i/a ", theme::key_hint_key()),
            Span::styled("severity  ", theme::key_hint()),
            Span::styled("f ", theme::key_hint_key()),
            Span::styled("pin  ", theme::key_hint()),
            Span::styled("F ", theme::key_hint_key()),
            Span::styled("pinned only", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Alerts"
    }
}
