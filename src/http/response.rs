//! Response rendering.
//!
//! # Responsibilities
//! - Turn a relay outcome into the HTML fragment sent to the browser
//! - Pick the outer status code per the configured policy
//!
//! # Design Decisions
//! - The downstream body is spliced in as raw bytes, not escaped, decoded or
//!   re-encoded
//! - Failures render message and cause as plain text

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::config::ErrorStatus;
use crate::relay::{RelayError, RelayOutcome};

const SUCCESS_PREFIX: &[u8] = b"<h2>RESULT of request to Backend service:</h2>Downstream service response: <p>";
const SUCCESS_SUFFIX: &[u8] = b"</p>";

/// HTML fragment for a successful chain.
pub fn render_success(body: &[u8]) -> Vec<u8> {
    let mut page = Vec::with_capacity(SUCCESS_PREFIX.len() + body.len() + SUCCESS_SUFFIX.len());
    page.extend_from_slice(SUCCESS_PREFIX);
    page.extend_from_slice(body);
    page.extend_from_slice(SUCCESS_SUFFIX);
    page
}

/// Text for a failed chain: `ERROR: <message> - FULL ERROR: <cause>`.
pub fn render_failure(err: &RelayError) -> String {
    match err.cause() {
        Some(cause) => format!("ERROR: {} - FULL ERROR: {}", err.message(), cause),
        None => format!("ERROR: {}", err.message()),
    }
}

/// Outer status for `outcome` under `policy`.
pub fn status_for(outcome: &RelayOutcome, policy: ErrorStatus) -> StatusCode {
    match (outcome, policy) {
        (RelayOutcome::Success(_), _) | (RelayOutcome::Failure(_), ErrorStatus::Ok) => StatusCode::OK,
        (RelayOutcome::Failure(_), ErrorStatus::BadGateway) => StatusCode::BAD_GATEWAY,
    }
}

/// Build the HTTP response for `outcome`.
pub fn into_response(outcome: RelayOutcome, policy: ErrorStatus) -> Response {
    let status = status_for(&outcome, policy);
    let page = match &outcome {
        RelayOutcome::Success(body) => render_success(body),
        RelayOutcome::Failure(err) => render_failure(err).into_bytes(),
    };
    (status, Html(page)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::FailureCause;

    #[test]
    fn test_success_keeps_payload_unmodified() {
        let payload = r#"{"name":"<b>Ada</b> & co"}"#;
        let page = String::from_utf8(render_success(payload.as_bytes())).unwrap();
        assert!(page.contains(payload));
        assert!(page.starts_with("<h2>RESULT of request to Backend service:</h2>"));
    }

    #[tokio::test]
    async fn test_non_utf8_payload_reaches_the_client_intact() {
        let payload = vec![123u8, 255, 254, 125];
        let response = into_response(RelayOutcome::Success(payload.clone().into()), ErrorStatus::Ok);

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let mut expected = SUCCESS_PREFIX.to_vec();
        expected.extend_from_slice(&payload);
        expected.extend_from_slice(SUCCESS_SUFFIX);
        assert_eq!(body.to_vec(), expected);
    }

    #[test]
    fn test_failure_with_and_without_cause() {
        let err = RelayError::destination(
            "Error: failed to call destination service.",
            FailureCause::Body("not found".into()),
        );
        assert_eq!(
            render_failure(&err),
            "ERROR: Error: failed to call destination service. - FULL ERROR: not found"
        );

        let err = RelayError::downstream("Error while calling downstream service", None);
        assert_eq!(render_failure(&err), "ERROR: Error while calling downstream service");
    }

    #[test]
    fn test_status_policy() {
        let failure = RelayOutcome::Failure(RelayError::downstream("x", None));
        let success = RelayOutcome::Success(Default::default());

        assert_eq!(status_for(&failure, ErrorStatus::Ok), StatusCode::OK);
        assert_eq!(status_for(&failure, ErrorStatus::BadGateway), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&success, ErrorStatus::BadGateway), StatusCode::OK);
    }
}
