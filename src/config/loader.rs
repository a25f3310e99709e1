//! Configuration loading from disk and the platform environment.
//!
//! Precedence, lowest first: built-in defaults, the optional TOML file, then
//! the environment (`VCAP_SERVICES` for credentials, `PORT` for the listener).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::schema::{RelayConfig, ServiceCredentials};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the platform service bindings.
pub const VCAP_SERVICES: &str = "VCAP_SERVICES";

/// Environment variable carrying the port assigned by the platform.
pub const PORT: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid VCAP_SERVICES: {0}")]
    ServiceBindings(#[from] serde_json::Error),

    #[error("Service binding '{0}' not found in VCAP_SERVICES")]
    MissingBinding(String),

    #[error("Invalid PORT value '{0}'")]
    InvalidPort(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Credential keys the destination service binding exposes.
#[derive(Debug, Default, Deserialize)]
struct BindingCredentials {
    #[serde(default)]
    clientid: String,
    #[serde(default)]
    clientsecret: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    url: String,
}

impl From<BindingCredentials> for ServiceCredentials {
    fn from(creds: BindingCredentials) -> Self {
        Self {
            client_id: creds.clientid,
            client_secret: creds.clientsecret,
            destination_service_uri: creds.uri,
            auth_server_url: creds.url,
        }
    }
}

/// Assemble the startup configuration from the optional file and the process
/// environment, then validate it.
pub fn load(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    load_with(path, |key| std::env::var(key).ok())
}

/// [`load`] with an explicit environment lookup.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => RelayConfig::default(),
    };
    apply_environment(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay platform-provided values onto `config`.
///
/// `lookup` abstracts the environment so callers can feed fixed values.
pub fn apply_environment<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(VCAP_SERVICES) {
        config.credentials = service_credentials(&raw, &config.relay.service_binding)?;
    }

    if let Some(port) = lookup(PORT) {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }

    Ok(())
}

/// Extract the credentials of the service instance named `binding` from a
/// `VCAP_SERVICES` document (`{ "<label>": [ { "name": ..., "credentials": ... } ] }`).
pub fn service_credentials(raw: &str, binding: &str) -> Result<ServiceCredentials, ConfigError> {
    // Other bindings are left as raw JSON; only the matching entry is typed.
    let services: HashMap<String, Value> = serde_json::from_str(raw)?;

    let credentials = services
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .find(|service| service.get("name").and_then(Value::as_str) == Some(binding))
        .map(|service| service.get("credentials").cloned().unwrap_or(Value::Null))
        .ok_or_else(|| ConfigError::MissingBinding(binding.to_string()))?;

    if credentials.is_null() {
        return Ok(BindingCredentials::default().into());
    }
    let credentials: BindingCredentials = serde_json::from_value(credentials)?;
    Ok(credentials.into())
}

fn read_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
