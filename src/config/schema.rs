//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration for the destination relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Destination and downstream settings.
    pub relay: RelaySettings,

    /// Service credentials for the destination service.
    ///
    /// Normally left empty in the file and filled from the platform
    /// service binding at startup.
    pub credentials: ServiceCredentials,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// What the relay calls and how it answers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RelaySettings {
    /// Name of the destination looked up on every request.
    pub destination_name: String,

    /// Path appended verbatim to the destination URL (no separator added).
    pub downstream_path: String,

    /// Name of the bound service instance holding the credentials.
    pub service_binding: String,

    /// Status code of the outer response when the chain fails.
    pub error_status: ErrorStatus,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            destination_name: "SM_TEST".to_string(),
            downstream_path: "srv/user".to_string(),
            service_binding: "sm-dest-service".to_string(),
            error_status: ErrorStatus::Ok,
        }
    }
}

/// Outer status policy for failed chains.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatus {
    /// Always answer 200 so the browser renders the error fragment.
    #[default]
    Ok,
    /// Answer 502 Bad Gateway on failure.
    BadGateway,
}

/// OAuth client credentials and endpoints of the destination service.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServiceCredentials {
    /// OAuth client identifier.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: String,

    /// Base URI of the destination-configuration service.
    pub destination_service_uri: String,

    /// Base URL of the authentication server issuing tokens.
    pub auth_server_url: String,
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("destination_service_uri", &self.destination_service_uri)
            .field("auth_server_url", &self.auth_server_url)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "destination_relay=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
