//! Per-request sequencing of the three outbound calls.
//!
//! # State machine
//! ```text
//! AwaitingToken ──ok──▶ AwaitingDestination ──ok──▶ AwaitingDownstream ──ok──▶ Rendered(Success)
//!       │                       │                          │
//!       └──────err──────────────┴──────────err─────────────┴──────────────────▶ Rendered(Failure)
//! ```
//!
//! # Design Decisions
//! - No retries, no backoff, no timeouts beyond the HTTP client defaults
//! - Every run starts from `AwaitingToken`; nothing survives between runs
//! - The first failure ends the chain

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::Client;

use crate::config::{RelayConfig, RelaySettings, ServiceCredentials};
use crate::observability::metrics;
use crate::relay::destination::DestinationResolver;
use crate::relay::downstream::DownstreamInvoker;
use crate::relay::error::RelayError;
use crate::relay::token::TokenAcquirer;
use crate::relay::types::{AccessToken, DestinationInfo};

/// Terminal result of one chain.
#[derive(Debug)]
pub enum RelayOutcome {
    /// Raw downstream body bytes.
    Success(Bytes),
    Failure(RelayError),
}

impl RelayOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RelayOutcome::Success(_))
    }
}

/// Where a chain currently stands.
#[derive(Debug)]
pub enum RelayState {
    AwaitingToken,
    AwaitingDestination(AccessToken),
    AwaitingDownstream(DestinationInfo),
    Rendered(RelayOutcome),
}

/// Runs token → destination → downstream for one inbound request.
#[derive(Clone)]
pub struct Orchestrator {
    token: TokenAcquirer,
    resolver: DestinationResolver,
    invoker: DownstreamInvoker,
    destination_name: String,
}

impl Orchestrator {
    pub fn new(client: Client, credentials: &ServiceCredentials, settings: &RelaySettings) -> Self {
        Self {
            token: TokenAcquirer::new(client.clone(), credentials),
            resolver: DestinationResolver::new(client.clone(), credentials),
            invoker: DownstreamInvoker::new(client, settings.downstream_path.clone()),
            destination_name: settings.destination_name.clone(),
        }
    }

    /// Build the shared HTTP client and wire all stages from `config`.
    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client, &config.credentials, &config.relay))
    }

    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    /// Drive a fresh chain to its terminal state.
    pub async fn run(&self) -> RelayOutcome {
        let start = Instant::now();
        let mut state = RelayState::AwaitingToken;

        loop {
            state = match state {
                RelayState::Rendered(outcome) => {
                    self.record(&outcome, start.elapsed());
                    return outcome;
                }
                pending => self.advance(pending).await,
            };
        }
    }

    /// Perform the call the state is waiting for and return the next state.
    pub async fn advance(&self, state: RelayState) -> RelayState {
        match state {
            RelayState::AwaitingToken => match self.token.acquire().await {
                Ok(token) => RelayState::AwaitingDestination(token),
                Err(e) => RelayState::Rendered(RelayOutcome::Failure(e)),
            },
            RelayState::AwaitingDestination(token) => {
                match self
                    .resolver
                    .resolve(&self.destination_name, &token.authorization())
                    .await
                {
                    Ok(info) => RelayState::AwaitingDownstream(info),
                    Err(e) => RelayState::Rendered(RelayOutcome::Failure(e)),
                }
            }
            RelayState::AwaitingDownstream(info) => {
                match self
                    .invoker
                    .invoke(&info.target_url, &info.authorization())
                    .await
                {
                    Ok(body) => RelayState::Rendered(RelayOutcome::Success(body)),
                    Err(e) => RelayState::Rendered(RelayOutcome::Failure(e)),
                }
            }
            rendered @ RelayState::Rendered(_) => rendered,
        }
    }

    fn record(&self, outcome: &RelayOutcome, elapsed: Duration) {
        match outcome {
            RelayOutcome::Success(body) => {
                tracing::info!(
                    destination = %self.destination_name,
                    bytes = body.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Relay chain completed"
                );
                metrics::record_chain("success", "none", elapsed);
            }
            RelayOutcome::Failure(err) => {
                tracing::warn!(
                    destination = %self.destination_name,
                    stage = %err.stage(),
                    error = %err,
                    cause = ?err.cause().map(ToString::to_string),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Relay chain failed"
                );
                metrics::record_chain("failure", err.stage().as_str(), elapsed);
            }
        }
    }
}
