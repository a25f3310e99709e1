//! Client-credentials token acquisition for the destination service.
//!
//! # Responsibilities
//! - POST `grant_type=client_credentials` to `{auth_server_url}/oauth/token`
//! - Authenticate the client with HTTP Basic, request no scopes
//! - Turn the JSON answer into an [`AccessToken`]
//!
//! # Design Decisions
//! - A fresh token per call; nothing is cached between requests
//! - Any non-2xx answer is a failure carrying status and raw body

use reqwest::header::ACCEPT;
use reqwest::Client;

use crate::config::ServiceCredentials;
use crate::relay::error::{FailureCause, RelayError, RelayResult};
use crate::relay::types::{AccessToken, TokenResponse};

const TOKEN_FAILED: &str = "Error: failed to get access token for Destination service";

/// Token type assumed when the server omits `token_type`.
const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Exchanges the client id and secret for a bearer token.
#[derive(Clone)]
pub struct TokenAcquirer {
    client: Client,
    token_endpoint: String,
    client_id: String,
    client_secret: String,
}

impl TokenAcquirer {
    pub fn new(client: Client, credentials: &ServiceCredentials) -> Self {
        Self {
            client,
            token_endpoint: format!(
                "{}/oauth/token",
                credentials.auth_server_url.trim_end_matches('/')
            ),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
        }
    }

    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    /// Perform one client-credentials exchange.
    pub async fn acquire(&self) -> RelayResult<AccessToken> {
        tracing::debug!(endpoint = %self.token_endpoint, "Requesting destination service token");

        let response = self
            .client
            .post(&self.token_endpoint)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| RelayError::token(TOKEN_FAILED, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::token(TOKEN_FAILED, e))?;

        if !status.is_success() {
            return Err(RelayError::token(
                TOKEN_FAILED,
                FailureCause::Body(format!("{}: {}", status, body)),
            ));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| RelayError::token(TOKEN_FAILED, e))?;

        if token.access_token.is_empty() {
            return Err(RelayError::token(
                TOKEN_FAILED,
                FailureCause::Invalid("token response carried an empty access_token".into()),
            ));
        }

        Ok(AccessToken {
            token_type: token
                .token_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            access_token: token.access_token,
        })
    }
}
