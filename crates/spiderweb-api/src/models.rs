// Wire-level DTOs for the Spiderweb backend.
//
// These mirror the JSON the backend actually emits; `spiderweb-core`
// translates them into canonical domain types. Parent foreign keys are
// deliberately absent where the backend omits them (core sites, devices,
// links) -- the fetch layer tags them from request context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend entity identifier. The backend is inconsistent about id types:
/// some tables use integers, others opaque strings (`"link-10g-abc"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdDto {
    Num(i64),
    Str(String),
}

impl std::fmt::Display for IdDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for IdDto {
    fn from(n: i64) -> Self {
        Self::Num(n)
    }
}

impl From<&str> for IdDto {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

// ── Topology entities ───────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkDto {
    pub id: IdDto,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoreSiteDto {
    pub id: IdDto,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoreDeviceDto {
    pub id: IdDto,
    pub name: String,
    /// Management address as the backend reports it (may be absent or junk).
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkDto {
    pub id: IdDto,
    pub source: IdDto,
    pub target: IdDto,
    /// `"up" | "down" | "issue"`.
    pub status: Option<String>,
    pub bandwidth: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndSiteDto {
    pub id: IdDto,
    pub device_id: IdDto,
    pub site_name_english: String,
    pub site_name_hebrew: String,
    pub interface_id: Option<String>,
}

// ── Alerts ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AlertDto {
    pub id: IdDto,
    /// `"error" | "warning" | "info"`.
    #[serde(rename = "type")]
    pub alert_type: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(rename = "networkLine", default)]
    pub network_line: Option<String>,
    #[serde(rename = "severityScore", default)]
    pub severity_score: Option<u8>,
    #[serde(default)]
    pub details: Option<String>,
}

// ── Mutation payloads ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct NewCoreSite {
    pub name: String,
    pub network_id: IdDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCoreDevice {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub core_site_id: IdDto,
}

// ── Error body ──────────────────────────────────────────────────────

/// The backend reports failures as `{"error": "..."}` or `{"message": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn id_dto_accepts_numbers_and_strings() {
        let n: IdDto = serde_json::from_str("7").unwrap();
        assert_eq!(n, IdDto::Num(7));

        let s: IdDto = serde_json::from_str("\"link-10g-abc\"").unwrap();
        assert_eq!(s, IdDto::Str("link-10g-abc".into()));
    }

    #[test]
    fn alert_dto_maps_renamed_fields() {
        let alert: AlertDto = serde_json::from_value(serde_json::json!({
            "id": "alert-1",
            "type": "warning",
            "message": "Latency threshold exceeded on link NYC-LDN",
            "timestamp": "2024-06-15T10:30:00Z",
            "isFavorite": true,
            "networkLine": "Line-Z-12"
        }))
        .unwrap();

        assert_eq!(alert.alert_type, "warning");
        assert!(alert.is_favorite);
        assert_eq!(alert.network_line.as_deref(), Some("Line-Z-12"));
        assert!(alert.severity_score.is_none());
    }
}
