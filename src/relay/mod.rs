//! Destination relay subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceCredentials (immutable, from config)
//!     → token.rs (client-credentials grant → AccessToken)
//!     → destination.rs (lookup by name → DestinationInfo)
//!     → downstream.rs (GET {URL}{path} → raw body)
//!     → orchestrator.rs (sequencing, RelayOutcome)
//! ```

pub mod destination;
pub mod downstream;
pub mod error;
pub mod orchestrator;
pub mod token;
pub mod types;

pub use destination::DestinationResolver;
pub use downstream::DownstreamInvoker;
pub use error::{FailureCause, RelayError, RelayResult, Stage};
pub use orchestrator::{Orchestrator, RelayOutcome, RelayState};
pub use token::TokenAcquirer;
pub use types::{AccessToken, DestinationInfo};
