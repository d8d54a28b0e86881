//! Error kinds surfaced by ingestion and question answering.
//!
//! Callers outside the library (the gateway, the CLI) only need to know
//! whether a failure was caused by the request itself or by a collaborator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or empty question, non-PDF upload, empty file.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The document yielded no usable text.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Every embedding or generation candidate was exhausted.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Vector store unreachable, or an upsert/query was rejected.
    #[error("store failure: {0}")]
    Store(String),
}

impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    pub fn provider_unavailable(msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// True when the caller can fix the failure by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Extraction(_))
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m)
            | Self::Extraction(m)
            | Self::ProviderUnavailable(m)
            | Self::Store(m) => m,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
