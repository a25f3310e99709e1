//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, GET / handler)
//!     → request.rs (assign / propagate request ID)
//!     → relay orchestrator (token → destination → downstream)
//!     → response.rs (HTML fragment, status policy)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
