//! Application core — event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use spiderweb_core::{Command, Controller};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Connection status as seen by the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Top-level application state and event loop.
pub struct App {
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Connection status indicator.
    connection_status: ConnectionStatus,
    /// Action sender — components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Controller for live data.
    controller: Controller,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            active_screen: ScreenId::Dashboard,
            screens,
            running: true,
            connection_status: ConnectionStatus::default(),
            action_tx,
            action_rx,
            controller,
            data_cancel: CancellationToken::new(),
            notification: None,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }

        // Spawn the data bridge
        {
            let controller = self.controller.clone();
            let cancel = self.data_cancel.clone();
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(controller, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Cancel the data bridge and clean up
        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='4')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) | (KeyModifiers::NONE, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            _ => {}
        }

        // Delegate to the active screen
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    /// Whether an action carries data every screen should see.
    fn is_broadcast(action: &Action) -> bool {
        matches!(
            action,
            Action::NetworksUpdated(_)
                | Action::CoreSitesUpdated(_)
                | Action::CoreDevicesUpdated(_)
                | Action::LinksUpdated(_)
                | Action::EndSitesUpdated(_)
                | Action::AlertsUpdated(_)
                | Action::StatusChanged(..)
        )
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
                return Ok(());
            }
            Action::SwitchScreen(screen) => {
                if let Some(old) = self.screens.get_mut(&self.active_screen) {
                    old.set_focused(false);
                }
                self.active_screen = *screen;
                if let Some(new) = self.screens.get_mut(&self.active_screen) {
                    new.set_focused(true);
                }
                return Ok(());
            }
            Action::Connected => {
                self.connection_status = ConnectionStatus::Connected;
                return Ok(());
            }
            Action::Connecting => {
                self.connection_status = ConnectionStatus::Connecting;
                return Ok(());
            }
            Action::Disconnected(reason) => {
                self.connection_status = ConnectionStatus::Disconnected;
                self.notification =
                    Some((Notification::error(reason.clone()), Instant::now()));
                return Ok(());
            }
            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
                return Ok(());
            }
            Action::Tick => {
                if let Some((_, shown_at)) = &self.notification {
                    if shown_at.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
                return Ok(());
            }
            Action::Retry => {
                self.spawn_retry();
                return Ok(());
            }
            Action::ToggleFavorite(id) => {
                self.spawn_toggle_favorite(id.clone());
                return Ok(());
            }
            _ => {}
        }

        // Forward data actions to every screen, interaction actions only
        // to the focused one.
        let mut follow_ups = Vec::new();
        if Self::is_broadcast(action) {
            for screen in self.screens.values_mut() {
                if let Some(follow_up) = screen.update(action)? {
                    follow_ups.push(follow_up);
                }
            }
        } else if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if let Some(follow_up) = screen.update(action)? {
                follow_ups.push(follow_up);
            }
        }
        for follow_up in follow_ups {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    /// Restart the fetch waterfall in the background (error-banner retry).
    fn spawn_retry(&self) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Action::Notify(Notification::info("Retrying from stage 1…")));
            if let Err(e) = controller.retry().await {
                warn!(error = %e, "retry failed");
                let _ = tx.send(Action::Notify(Notification::error(format!("{e}"))));
            }
        });
    }

    /// Flip an alert's favorite flag through the command channel.
    fn spawn_toggle_favorite(&self, id: spiderweb_core::EntityId) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = controller
                .execute(Command::ToggleAlertFavorite { id })
                .await
            {
                warn!(error = %e, "favorite toggle failed");
                let _ = tx.send(Action::Notify(Notification::error(format!("{e}"))));
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let [tab_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_tabs(frame, tab_area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, body_area);
        }

        self.render_status_bar(frame, status_area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|s| Line::from(format!(" {} {} ", s.number(), s.label())))
            .collect();
        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(theme::tab_inactive())
            .highlight_style(theme::tab_active())
            .divider("│");
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let (status_label, status_style) = match self.connection_status {
            ConnectionStatus::Connected => ("● connected", theme::tab_active()),
            ConnectionStatus::Connecting => ("◐ connecting", theme::key_hint()),
            ConnectionStatus::Disconnected => ("○ disconnected", theme::banner_error()),
        };

        let mut spans = vec![
            Span::styled(format!(" {status_label}  "), status_style),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit  ", theme::key_hint()),
            Span::styled("1-4 ", theme::key_hint_key()),
            Span::styled("screens", theme::key_hint()),
        ];

        if let Some((notification, _)) = &self.notification {
            let style = match notification.level {
                NotificationLevel::Info => theme::key_hint(),
                NotificationLevel::Error => theme::banner_error(),
            };
            spans.push(Span::styled(
                format!("   {}", notification.message),
                style,
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
