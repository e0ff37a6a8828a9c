// ── Link domain types ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Operational status of a link.
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
pub enum LinkStatus {
    Up,
    Down,
    Issue,
}

impl LinkStatus {
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Up)
    }
}

/// Which two entity classes a link connects.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum LinkKind {
    /// Trunk between two core devices.
    CoreToCore,
    /// Access link from a core device down to an end-site.
    CoreToSite,
}

/// A connection record between two devices, or a device and an end-site.
///
/// `source`/`target` are core-device ids for [`LinkKind::CoreToCore`]; for
/// [`LinkKind::CoreToSite`] the target references an end-site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: EntityId,
    pub source: EntityId,
    pub target: EntityId,
    pub status: LinkStatus,
    pub bandwidth: Option<String>,
    pub kind: LinkKind,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn link_status_parses_case_insensitively() {
        assert_eq!(LinkStatus::from_str("up").unwrap(), LinkStatus::Up);
        assert_eq!(LinkStatus::from_str("Down").unwrap(), LinkStatus::Down);
        assert!(LinkStatus::from_str("flapping").is_err());
    }

    #[test]
    fn link_kind_uses_kebab_case() {
        assert_eq!(LinkKind::CoreToCore.to_string(), "core-to-core");
        assert_eq!(
            LinkKind::from_str("core-to-site").unwrap(),
            LinkKind::CoreToSite
        );
    }
}
