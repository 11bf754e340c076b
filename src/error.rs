//! Error types

use thiserror::Error;

/// Failure to retrieve one playlist document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("Read failed: {0}")]
    Body(String),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

/// Failure of a whole ingestion run. Individual source failures never
/// surface here; only the case where nothing could be loaded does.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No playlist sources configured")]
    NoSources,

    #[error("All {attempted} playlist sources failed to load")]
    AllSourcesFailed { attempted: usize },
}

/// Failure of the backing key-value slot
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
