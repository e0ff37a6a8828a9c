// ── Core identity type ──
//
// EntityId is the foundation of every domain type. The backend mixes
// integer ids (networks, sites, devices) with opaque string ids (links,
// alerts); this enum unifies both behind a single ergonomic interface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use spiderweb_api::models::IdDto;

/// Canonical identifier for any Spiderweb entity.
///
/// Transparently wraps either a backend integer id or an opaque string id
/// (e.g. `"link-10g-abc"`). Consumers never care which.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Num(i64),
    Str(String),
}

impl EntityId {
    pub fn as_num(&self) -> Option<i64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Num(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Num(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Num(n),
            Err(_) => Self::Str(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<IdDto> for EntityId {
    fn from(id: IdDto) -> Self {
        match id {
            IdDto::Num(n) => Self::Num(n),
            IdDto::Str(s) => Self::Str(s),
        }
    }
}

impl From<&EntityId> for IdDto {
    fn from(id: &EntityId) -> Self {
        match id {
            EntityId::Num(n) => IdDto::Num(*n),
            EntityId::Str(s) => IdDto::Str(s.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_from_numeric_string() {
        let id = EntityId::from("42");
        assert_eq!(id.as_num(), Some(42));
    }

    #[test]
    fn entity_id_from_opaque_string() {
        let id = EntityId::from("link-10g-abc");
        assert_eq!(id.as_str(), Some("link-10g-abc"));
    }

    #[test]
    fn entity_id_display() {
        assert_eq!(EntityId::Num(7).to_string(), "7");
        assert_eq!(EntityId::from("es-1").to_string(), "es-1");
    }

    #[test]
    fn entity_id_from_str_trait() {
        let id: EntityId = "rtr-01".parse().unwrap();
        assert_eq!(id.as_str(), Some("rtr-01"));
    }

    #[test]
    fn entity_id_round_trips_through_dto() {
        let id = EntityId::Num(9);
        let dto = IdDto::from(&id);
        assert_eq!(EntityId::from(dto), id);
    }

    #[test]
    fn entity_id_deserializes_both_shapes() {
        let n: EntityId = serde_json::from_str("3").unwrap();
        let s: EntityId = serde_json::from_str("\"alert-9\"").unwrap();
        assert_eq!(n, EntityId::Num(3));
        assert_eq!(s, EntityId::Str("alert-9".into()));
    }
}
