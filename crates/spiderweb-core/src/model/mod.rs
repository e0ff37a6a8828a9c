// ── Domain model ──
//
// Canonical types for the Spiderweb topology and alerting data. Wire DTOs
// live in `spiderweb-api`; `convert` translates them into these types,
// tagging the parent foreign keys the backend omits.

mod alert;
mod device;
mod entity_id;
mod link;
mod network;
mod site;

pub use alert::{Alert, AlertSeverity};
pub use device::CoreDevice;
pub use entity_id::EntityId;
pub use link::{Link, LinkKind, LinkStatus};
pub use network::Network;
pub use site::{CoreSite, EndSite};
