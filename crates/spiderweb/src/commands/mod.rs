//! Command handlers, one module per resource.

pub mod alerts;
pub mod auth;
pub mod config_cmd;
pub mod devices;
pub mod endsites;
pub mod links;
pub mod networks;
pub mod sites;
pub mod topology;

mod util;
