//! Failure types of the relay chain.

use std::fmt;

use thiserror::Error;

/// Where in the chain a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Token,
    Destination,
    Downstream,
    /// The chain's task died before producing an outcome.
    Task,
}

impl Stage {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Token => "token",
            Stage::Destination => "destination",
            Stage::Downstream => "downstream",
            Stage::Task => "task",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong underneath a relay failure.
#[derive(Debug, Error)]
pub enum FailureCause {
    /// Connection, TLS or protocol error from the HTTP client.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Raw body of an unexpected response.
    #[error("{0}")]
    Body(String),

    /// Response body was not the expected JSON document.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Well-formed response with unusable content.
    #[error("{0}")]
    Invalid(String),
}

/// A failed relay chain. One variant per outbound call, plus the task failure.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{message}")]
    TokenAcquisition {
        message: String,
        #[source]
        cause: FailureCause,
    },

    #[error("{message}")]
    DestinationResolution {
        message: String,
        #[source]
        cause: FailureCause,
    },

    /// The cause is absent for non-200 answers; the downstream status and
    /// body are not reported.
    #[error("{message}")]
    DownstreamCall {
        message: String,
        #[source]
        cause: Option<FailureCause>,
    },

    /// Panic or cancellation of the spawned chain; details stay in the logs.
    #[error("{message}")]
    Aborted { message: String },
}

pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    pub fn token(message: impl Into<String>, cause: impl Into<FailureCause>) -> Self {
        Self::TokenAcquisition {
            message: message.into(),
            cause: cause.into(),
        }
    }

    pub fn destination(message: impl Into<String>, cause: impl Into<FailureCause>) -> Self {
        Self::DestinationResolution {
            message: message.into(),
            cause: cause.into(),
        }
    }

    pub fn downstream(message: impl Into<String>, cause: Option<FailureCause>) -> Self {
        Self::DownstreamCall {
            message: message.into(),
            cause,
        }
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted {
            message: message.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::TokenAcquisition { .. } => Stage::Token,
            Self::DestinationResolution { .. } => Stage::Destination,
            Self::DownstreamCall { .. } => Stage::Downstream,
            Self::Aborted { .. } => Stage::Task,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::TokenAcquisition { message, .. }
            | Self::DestinationResolution { message, .. }
            | Self::DownstreamCall { message, .. }
            | Self::Aborted { message } => message,
        }
    }

    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            Self::TokenAcquisition { cause, .. } | Self::DestinationResolution { cause, .. } => {
                Some(cause)
            }
            Self::DownstreamCall { cause, .. } => cause.as_ref(),
            Self::Aborted { .. } => None,
        }
    }
}
