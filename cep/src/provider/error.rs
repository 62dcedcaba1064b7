//! Lookup error types

use thiserror::Error;

/// Errors a single provider lookup can end with
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Failed to read response body: {0}")]
    Io(#[source] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CEP {cep} not found: {message}")]
    NotFound { cep: String, message: String },

    #[error("Lookup task ended without reporting a result")]
    WorkerLost,
}

impl LookupError {
    /// Short tag for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Network(_) => "network",
            LookupError::Io(_) => "io",
            LookupError::Decode(_) => "decode",
            LookupError::NotFound { .. } => "not-found",
            LookupError::WorkerLost => "worker-lost",
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, LookupError::Decode(_))
    }
}
