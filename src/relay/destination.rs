//! Destination lookup against the destination-configuration REST API.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};

use crate::config::ServiceCredentials;
use crate::relay::error::{FailureCause, RelayError, RelayResult};
use crate::relay::types::{DestinationInfo, DestinationLookup};

const LOOKUP_PATH: &str = "/destination-configuration/v1/destinations/";

/// Resolves a destination name to its target URL and downstream token.
#[derive(Clone)]
pub struct DestinationResolver {
    client: Client,
    service_uri: String,
}

impl DestinationResolver {
    pub fn new(client: Client, credentials: &ServiceCredentials) -> Self {
        Self {
            client,
            service_uri: credentials
                .destination_service_uri
                .trim_end_matches('/')
                .to_string(),
        }
    }

    pub fn lookup_url(&self, name: &str) -> String {
        format!("{}{}{}", self.service_uri, LOOKUP_PATH, name)
    }

    /// Look up `name`, presenting `authorization` to the destination service.
    ///
    /// Only the first entry of `authTokens` is used.
    pub async fn resolve(&self, name: &str, authorization: &str) -> RelayResult<DestinationInfo> {
        let url = self.lookup_url(name);
        tracing::debug!(destination = %name, url = %url, "Resolving destination");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| {
                RelayError::destination("Error occurred while calling Destination service", e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            RelayError::destination("Error occurred while calling Destination service", e)
        })?;

        if status != StatusCode::OK {
            tracing::debug!(destination = %name, status = %status, "Destination lookup rejected");
            return Err(RelayError::destination(
                "Error: failed to call destination service.",
                FailureCause::Body(body),
            ));
        }

        parse_lookup(name, &body)
    }
}

/// Turn a 200 lookup body into [`DestinationInfo`].
pub(crate) fn parse_lookup(name: &str, body: &str) -> RelayResult<DestinationInfo> {
    let lookup: DestinationLookup = serde_json::from_str(body).map_err(|e| {
        RelayError::destination(
            "Error: destination service returned an unreadable configuration",
            e,
        )
    })?;

    let token = lookup.auth_tokens.into_iter().next().ok_or_else(|| {
        RelayError::destination(
            format!("Error: destination '{}' has no auth tokens", name),
            FailureCause::Invalid("authTokens is empty".into()),
        )
    })?;

    if let Some(error) = token.error {
        return Err(RelayError::destination(
            format!("Error: destination service could not issue a token for '{}'", name),
            FailureCause::Invalid(error),
        ));
    }

    Ok(DestinationInfo {
        target_url: lookup.configuration.url,
        token_type: token.token_type,
        token_value: token.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver(uri: String) -> DestinationResolver {
        DestinationResolver::new(
            Client::new(),
            &ServiceCredentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
                destination_service_uri: uri,
                auth_server_url: "http://unused.invalid".into(),
            },
        )
    }

    #[test]
    fn test_lookup_url_shape() {
        let r = resolver("https://destination-configuration.example.com/".into());
        assert_eq!(
            r.lookup_url("SM_TEST"),
            "https://destination-configuration.example.com/destination-configuration/v1/destinations/SM_TEST"
        );
    }

    #[test]
    fn test_first_token_wins() {
        let info = parse_lookup(
            "SM_TEST",
            r#"{
                "destinationConfiguration": { "URL": "https://backend.example.com/" },
                "authTokens": [
                    { "type": "bearer", "value": "first" },
                    { "type": "bearer", "value": "second" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(info.target_url, "https://backend.example.com/");
        assert_eq!(info.authorization(), "bearer first");
    }

    #[test]
    fn test_empty_auth_tokens_is_hard_failure() {
        let err = parse_lookup(
            "SM_TEST",
            r#"{ "destinationConfiguration": { "URL": "https://b/" }, "authTokens": [] }"#,
        )
        .unwrap_err();

        assert_eq!(err.message(), "Error: destination 'SM_TEST' has no auth tokens");
    }

    #[test]
    fn test_token_error_entry_is_failure() {
        let err = parse_lookup(
            "SM_TEST",
            r#"{
                "destinationConfiguration": { "URL": "https://b/" },
                "authTokens": [ { "type": "", "value": "", "error": "Retrieval of OAuth token failed" } ]
            }"#,
        )
        .unwrap_err();

        assert_eq!(
            err.cause().map(ToString::to_string).as_deref(),
            Some("Retrieval of OAuth token failed")
        );
    }

    #[test]
    fn test_malformed_json_is_failure() {
        let err = parse_lookup("SM_TEST", "<html>gateway</html>").unwrap_err();
        assert!(matches!(
            err,
            RelayError::DestinationResolution { cause: FailureCause::Json(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_resolve_presents_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/destination-configuration/v1/destinations/SM_TEST"))
            .and(header("authorization", "bearer dest-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "destinationConfiguration": { "URL": "https://backend.example.com/" },
                "authTokens": [ { "type": "bearer", "value": "downstream-token" } ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let info = resolver(server.uri())
            .resolve("SM_TEST", "bearer dest-token")
            .await
            .unwrap();

        assert_eq!(info.token_value, "downstream-token");
    }

    #[tokio::test]
    async fn test_not_found_keeps_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Configuration with name SM_TEST was not found"))
            .mount(&server)
            .await;

        let err = resolver(server.uri())
            .resolve("SM_TEST", "bearer t")
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Error: failed to call destination service.");
        assert_eq!(
            err.cause().map(ToString::to_string).as_deref(),
            Some("Configuration with name SM_TEST was not found")
        );
    }
}
