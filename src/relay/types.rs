//! Request-scoped values passed between the relay stages, and the wire
//! formats they are read from.

use serde::Deserialize;

/// Bearer credential for the destination service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token_type: String,
    pub access_token: String,
}

impl AccessToken {
    /// Value for the `Authorization` header: `<type> <token>`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Where to send the downstream call and with which credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationInfo {
    pub target_url: String,
    pub token_type: String,
    pub token_value: String,
}

impl DestinationInfo {
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.token_value)
    }
}

/// Token endpoint answer of a client-credentials grant.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Destination lookup answer. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct DestinationLookup {
    #[serde(rename = "destinationConfiguration")]
    pub configuration: DestinationConfiguration,
    #[serde(rename = "authTokens", default)]
    pub auth_tokens: Vec<AuthToken>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DestinationConfiguration {
    #[serde(rename = "URL")]
    pub url: String,
}

/// One entry of `authTokens`. The service reports token retrieval problems
/// through `error` instead of a value.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthToken {
    #[serde(rename = "type", default)]
    pub token_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub error: Option<String>,
}
