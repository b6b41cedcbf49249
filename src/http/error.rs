//! Typed request failures.

use reqwest::StatusCode;
use thiserror::Error;

use super::response::Payload;

/// Broad failure class of a request, deciding whether it is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 4xx response, or a request that could not be built. Never retried.
    Client,
    /// 5xx or any other non-success response. Retried.
    Server,
    /// The transport failed before a complete response arrived. Retried.
    Network,
}

/// Failure of one logical API call.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RequestError {
    kind: ErrorKind,
    message: String,
    status_code: u16,
    payload: Option<Payload>,
    #[source]
    source: Option<reqwest::Error>,
}

impl RequestError {
    /// Builds the error for a non-success HTTP response.
    ///
    /// The message comes from the payload's `error` field when present.
    pub fn from_response(status: StatusCode, payload: Payload) -> Self {
        let message = payload
            .error_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Server error {}", status.as_u16()));

        let kind = if status.is_client_error() {
            ErrorKind::Client
        } else {
            ErrorKind::Server
        };

        Self {
            kind,
            message,
            status_code: status.as_u16(),
            payload: Some(payload),
            source: None,
        }
    }

    /// Builds the error for a transport failure. The status code is 0.
    ///
    /// The transport error stays in the source chain, not in the message.
    pub fn network(error: reqwest::Error) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: "Network error".to_string(),
            status_code: 0,
            payload: None,
            source: Some(error),
        }
    }

    /// Builds the error for a request that could not be constructed.
    pub fn invalid_request(error: reqwest::Error) -> Self {
        Self {
            kind: ErrorKind::Client,
            message: "Invalid request".to_string(),
            status_code: 0,
            payload: None,
            source: Some(error),
        }
    }

    /// Classifies a reqwest transport error.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::invalid_request(error)
        } else {
            Self::network(error)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Client errors are the caller's fault; everything else is transient.
    pub fn is_retryable(&self) -> bool {
        self.kind != ErrorKind::Client
    }
}
