//! Error types for the Power Cloud API client.

use thiserror::Error;

use crate::waiter::FetchError;

/// Errors raised by [`crate::power::PowerClient`] implementations.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum PowerClientError {
    /// Raised when the client configuration is unusable.
    #[error("client configuration error: {0}")]
    Config(String),
    /// Raised when the API answers 404 for the requested resource.
    #[error("{resource} not found")]
    NotFound {
        /// Request path of the missing resource.
        resource: String,
    },
    /// Raised when the request cannot be sent or the response not read.
    #[error("http error: {message}")]
    Http {
        /// Message returned by the HTTP client.
        message: String,
    },
    /// Raised when the API answers with a non-success status.
    #[error("api returned status {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, usually a JSON error document.
        body: String,
    },
    /// Raised when a success response cannot be decoded.
    #[error("failed to decode {resource}: {message}")]
    Decode {
        /// Request path whose response failed to decode.
        resource: String,
        /// Decoder error message.
        message: String,
    },
}

impl From<PowerClientError> for FetchError {
    fn from(value: PowerClientError) -> Self {
        match value {
            PowerClientError::NotFound { .. } => Self::NotFound,
            other => Self::transport(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for PowerClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http {
            message: value.to_string(),
        }
    }
}
