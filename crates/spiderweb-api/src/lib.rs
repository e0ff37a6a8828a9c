// spiderweb-api: Async Rust client for the Spiderweb NOC backend REST API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod endpoints;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
