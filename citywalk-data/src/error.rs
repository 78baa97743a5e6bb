//! Error types shared by the HTTP collaborators.

use std::time::Duration;

use thiserror::Error;

/// Transport-level errors encountered while issuing HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Description from the transport.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The response body could not be decoded.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Fully qualified request URL.
        url: String,
        /// Decoder message.
        message: String,
    },
    /// No Tokio runtime could be started to drive the request.
    #[error("failed to start Tokio runtime: {message}")]
    Runtime {
        /// Description from the runtime builder.
        message: String,
    },
}

/// Errors raised while constructing an HTTP collaborator.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured endpoint is not a valid URL.
    #[error("invalid endpoint '{url}': {source}")]
    InvalidUrl {
        /// Rejected endpoint.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
}

/// Classify a `reqwest` failure.
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }
    if error.is_decode() {
        return TransportError::Decode {
            url: url.to_owned(),
            message: error.to_string(),
        };
    }
    TransportError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}
