//! Error types for the stream client and the startup gate.

use thiserror::Error;

/// Failure of a single request to the streaming service.
#[derive(Error, Debug)]
pub enum StreamError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with an error.
    #[error("service error {status} {kind}: {message}")]
    Service {
        status: u16,
        kind: String,
        message: String,
    },

    /// The response body could not be understood.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The request could not be signed.
    #[error("signing error: {0}")]
    Signing(String),
}

impl From<reqwest::Error> for StreamError {
    fn from(e: reqwest::Error) -> Self {
        StreamError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(e: serde_json::Error) -> Self {
        StreamError::Decode(e.to_string())
    }
}

/// Conditions that stop the producer before it publishes anything.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("{0} is not a valid AWS region.")]
    InvalidRegion(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Could not create stream client: {0}")]
    Client(String),

    #[error("Stream {stream} is not active. Please wait a few moments and try again.")]
    StreamNotActive { stream: String, status: String },

    #[error("Error found while describing the stream {stream}\n{source}")]
    DescribeFailed {
        stream: String,
        #[source]
        source: StreamError,
    },
}
