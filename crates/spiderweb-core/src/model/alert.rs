// ── Alert domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Alert severity, in decreasing order of urgency.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AlertSeverity {
    Error,
    Warning,
    Info,
}

/// An operational alert. Independent of the topology entities; re-fetched
/// by the periodic poll task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: EntityId,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// User-pinned flag. Local to the store -- the backend has no favorite
    /// endpoint, so refreshes must preserve it for matching ids.
    pub is_favorite: bool,
    /// Emitting subsystem (e.g. `Realtime-Monitor`).
    pub source: Option<String>,
    /// The network line the alert concerns, when attributable.
    pub network_line: Option<String>,
    /// Backend-assigned 1-10 urgency score.
    pub severity_score: Option<u8>,
    pub details: Option<String>,
}
