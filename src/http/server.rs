//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router serving `GET /`
//! - Wire up middleware (request ID, tracing)
//! - Run one relay chain per request and render the outcome
//! - Bind server to listener and stop on the shutdown signal

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::{ErrorStatus, RelayConfig};
use crate::http::{request, response};
use crate::lifecycle::ShutdownSignal;
use crate::relay::{Orchestrator, RelayError, RelayOutcome};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub error_status: ErrorStatus,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let orchestrator = Arc::new(Orchestrator::from_config(&config)?);
        let state = AppState {
            orchestrator,
            error_status: config.relay.error_status,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(relay_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request::request_id(req),
                )
            }))
            .layer(request::propagate_request_id_layer())
            .layer(request::set_request_id_layer())
    }

    /// Router with all layers, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            destination = %self.config.relay.destination_name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Runs the relay chain for one inbound request.
///
/// The chain is spawned so that it runs to completion even if the client
/// goes away and this handler future is dropped.
async fn relay_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    let request_id = request::request_id(&req).to_string();
    let orchestrator = state.orchestrator.clone();
    let span = tracing::info_span!(
        "relay_chain",
        request_id = %request_id,
        destination = %orchestrator.destination_name(),
    );

    let chain = tokio::spawn(async move { orchestrator.run().await }.instrument(span));

    let outcome = settle(chain.await, &request_id);
    response::into_response(outcome, state.error_status)
}

/// Fold a dead chain task into a regular failure so the status policy
/// applies to it as well.
fn settle(joined: Result<RelayOutcome, JoinError>, request_id: &str) -> RelayOutcome {
    joined.unwrap_or_else(|e| {
        tracing::error!(request_id = %request_id, error = %e, "Relay task aborted");
        RelayOutcome::Failure(RelayError::aborted("Error: relay task aborted"))
    })
}
