//! Error types for the checks API client.
//!
//! # Design
//! Every failure mode of an API call gets its own variant: encoding the
//! payload, the transport round-trip, a status other than the one the
//! operation expects, and decoding the body. Status and decode errors keep the
//! raw response body so callers can see what the server actually said; the
//! client never tries to interpret error bodies.

use thiserror::Error;

/// Errors returned by `ChecklyClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(#[source] serde_json::Error),

    /// The HTTP round-trip itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a status other than the expected one.
    #[error("unexpected response status {status}: {body:?}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("decoding error for data {body}: {source}")]
    DeserializationError {
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status received before the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            ApiError::Transport(TransportError::ReadBody { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while performing a single HTTP round-trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be built, e.g. a malformed URL.
    #[error("failed to create HTTP request: {0}")]
    InvalidRequest(String),

    /// The request could not be sent or the connection failed.
    #[error("HTTP request failed: {0}")]
    Send(String),

    /// The status line arrived but the body could not be read.
    #[error("failed to read response body (status {status}): {message}")]
    ReadBody { status: u16, message: String },
}

/// Errors raised while assembling a `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingApiKey(&'static str),
}
