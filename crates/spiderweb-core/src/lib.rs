//! Reactive data layer between `spiderweb-api` and UI consumers (CLI / TUI).
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the Spiderweb workspace:
//!
//! - **[`Controller`]** — Central facade managing the session lifecycle:
//!   [`connect()`](Controller::connect) authenticates, runs the dependent
//!   topology fetch waterfall, then spawns background tasks for alert polling
//!   and command processing. [`Controller::oneshot()`] provides a lightweight
//!   fire-and-forget mode for single CLI invocations.
//!
//! - **[`DataStore`]** — Lock-free reactive storage built on
//!   `EntityCollection<T>` (`DashMap` + `tokio::sync::watch` channels), one
//!   collection per entity type, each with an observable load status
//!   (`Idle → Loading → Succeeded | Failed`).
//!
//! - **Fetch orchestration** — Stage 1 networks → stage 2 core sites →
//!   stage 3 core devices → stage 4 links, with fan-out/fan-in concurrency
//!   inside each stage and independent end-site/alert fetches alongside.
//!
//! - **[`Selectors`]** — Memoized pure derived views (links per network,
//!   devices per site, the topology graph projection) recomputed only when
//!   their input collections change.
//!
//! - **[`Command`]** — Typed mutation requests routed through an `mpsc`
//!   channel to the controller's command processor. Reads bypass the channel
//!   via direct `DataStore` snapshots.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod select;
pub mod store;
pub mod stream;

mod orchestrator;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{AuthCredentials, BackendConfig, TlsVerification};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use select::{AlertCounts, EndSiteGroup, Selectors, TopologyGraph, TopologyLink, TopologyNode};
pub use store::{CollectionStatus, DataStore};
pub use stream::EntityStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alert, AlertSeverity, CoreDevice, CoreSite, EndSite, EntityId, Link, LinkKind, LinkStatus,
    Network,
};
