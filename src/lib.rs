//! Destination relay library.
//!
//! Authenticates against the destination-configuration service, resolves one
//! named destination and forwards a single read request to it for every
//! inbound `GET /`.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{Orchestrator, RelayError, RelayOutcome};
