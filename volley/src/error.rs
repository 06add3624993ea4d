use std::time::Duration;
use thiserror::Error;
use volley_core::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failure to complete an HTTP exchange. Never raised for an HTTP error status.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}
