//! The single read request forwarded to the resolved service.

use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};

use crate::relay::error::{RelayError, RelayResult};

/// Issues `GET {base_url}{path}` and returns the body bytes untouched.
#[derive(Clone)]
pub struct DownstreamInvoker {
    client: Client,
    path: String,
}

impl DownstreamInvoker {
    pub fn new(client: Client, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    /// Concatenates without inserting a separator; `base_url` is expected to
    /// end with `/` already.
    pub fn request_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path)
    }

    pub async fn invoke(&self, base_url: &str, authorization: &str) -> RelayResult<Bytes> {
        let url = self.request_url(base_url);
        tracing::debug!(url = %url, "Calling downstream service");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                RelayError::downstream("Error occurred while calling downstream service", Some(e.into()))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(url = %url, status = %status, "Downstream answered with non-200");
            return Err(RelayError::downstream("Error while calling downstream service", None));
        }

        response.bytes().await.map_err(|e| {
            RelayError::downstream("Error occurred while calling downstream service", Some(e.into()))
        })
    }
}
