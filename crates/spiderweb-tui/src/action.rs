//! All possible UI actions. Actions are the sole mechanism for state
//! mutation in the TUI: terminal events, data-bridge updates, and screen
//! key handlers all reduce to these.

use std::sync::Arc;

use spiderweb_core::{
    Alert, AlertSeverity, CollectionStatus, CoreDevice, CoreSite, EndSite, EntityId, Link, Network,
};

use crate::screen::ScreenId;

/// Which store collection a status transition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Networks,
    CoreSites,
    CoreDevices,
    Links,
    EndSites,
    Alerts,
}

impl CollectionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Networks => "Networks",
            Self::CoreSites => "Core sites",
            Self::CoreDevices => "Core devices",
            Self::Links => "Links",
            Self::EndSites => "End-sites",
            Self::Alerts => "Alerts",
        }
    }
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),

    // ── Data events (from spiderweb-core streams) ─────────────────
    NetworksUpdated(Arc<Vec<Arc<Network>>>),
    CoreSitesUpdated(Arc<Vec<Arc<CoreSite>>>),
    CoreDevicesUpdated(Arc<Vec<Arc<CoreDevice>>>),
    LinksUpdated(Arc<Vec<Arc<Link>>>),
    EndSitesUpdated(Arc<Vec<Arc<EndSite>>>),
    AlertsUpdated(Arc<Vec<Arc<Alert>>>),
    StatusChanged(CollectionKind, CollectionStatus),

    // ── Connection status ─────────────────────────────────────────
    Connected,
    Disconnected(String),
    Connecting,

    // ── User mutations ────────────────────────────────────────────
    /// Restart the fetch waterfall from stage 1 (error-banner retry).
    Retry,
    /// Flip the favorite flag on one alert.
    ToggleFavorite(EntityId),

    // ── Topology ──────────────────────────────────────────────────
    CycleNetwork,
    TopologyPan(i16, i16),
    TopologyZoom(f64),
    TopologyReset,

    // ── Alerts screen ─────────────────────────────────────────────
    FilterSeverity(Option<AlertSeverity>),
    ToggleFavoritesOnly,

    // ── Table operations ──────────────────────────────────────────
    ScrollUp,
    ScrollDown,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
