//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that credentials are present once the environment was applied
//! - Check that base URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("destination name '{0}' may only contain letters, digits, '-', '_' and '.'")]
    InvalidDestinationName(String),
}

/// Validate a fully assembled configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);

    let creds = &config.credentials;
    check_non_empty(&mut errors, "credentials.client_id", &creds.client_id);
    check_non_empty(&mut errors, "credentials.client_secret", &creds.client_secret);
    check_url(&mut errors, "credentials.destination_service_uri", &creds.destination_service_uri);
    check_url(&mut errors, "credentials.auth_server_url", &creds.auth_server_url);

    let name = &config.relay.destination_name;
    if name.is_empty() {
        errors.push(ValidationError::Empty { field: "relay.destination_name" });
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        errors.push(ValidationError::InvalidDestinationName(name.clone()));
    }

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_non_empty(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field });
        return;
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ServiceCredentials;

    fn valid_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.credentials = ServiceCredentials {
            client_id: "sb-client".into(),
            client_secret: "secret".into(),
            destination_service_uri: "https://destination-configuration.example.com".into(),
            auth_server_url: "https://subaccount.authentication.example.com".into(),
        };
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn test_default_config_reports_every_missing_credential() {
        let errors = validate_config(&RelayConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Empty { field: "credentials.client_id" }));
        assert!(errors.contains(&ValidationError::Empty { field: "credentials.auth_server_url" }));
    }

    #[test]
    fn test_rejects_non_http_urls_and_bad_names() {
        let mut config = valid_config();
        config.credentials.auth_server_url = "ftp://auth.example.com".into();
        config.relay.destination_name = "../admin".into();
        config.listener.bind_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::InvalidAddress { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidUrl { field: "credentials.auth_server_url", .. }));
        assert_eq!(errors[2], ValidationError::InvalidDestinationName("../admin".into()));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid_config();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
