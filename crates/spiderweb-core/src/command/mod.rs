// ── Command API ──
//
// All write operations flow through a unified `Command` enum. Mutations are
// pessimistic: the controller calls the backend, then re-runs the affected
// fetch stage scoped to the parent id so derived data refreshes. Reads
// never come through here -- they use DataStore snapshots directly.

pub mod requests;

use crate::error::CoreError;
use crate::model::EntityId;

pub use requests::{CreateCoreDeviceRequest, CreateCoreSiteRequest};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All possible write operations against the backend (plus the store-local
/// favorite toggle, which shares the same dispatch path so views have a
/// single mutation surface).
#[derive(Debug, Clone)]
pub enum Command {
    // ── Core-site CRUD ───────────────────────────────────────────────
    AddCoreSite(CreateCoreSiteRequest),
    DeleteCoreSite {
        id: EntityId,
        /// Parent network, for the scoped re-fetch.
        network_id: EntityId,
    },

    // ── Core-device CRUD ─────────────────────────────────────────────
    AddCoreDevice(CreateCoreDeviceRequest),
    DeleteCoreDevice {
        id: EntityId,
        /// Parent site, for the scoped re-fetch.
        core_site_id: EntityId,
    },

    // ── Alerts ───────────────────────────────────────────────────────
    /// Store-local: flip the favorite flag on one alert.
    ToggleAlertFavorite { id: EntityId },
    /// Re-fetch alerts now instead of waiting for the poll tick.
    RefreshAlerts,

    // ── Full reload ──────────────────────────────────────────────────
    /// User-triggered retry: restart the fetch waterfall from stage 1.
    Reload,
}

/// Result of a command execution.
#[derive(Debug)]
pub enum CommandResult {
    Ok,
    /// New favorite state after a toggle.
    Favorite { id: EntityId, is_favorite: bool },
}
