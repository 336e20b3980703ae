//! Error types for the sample analysis engine
//!
//! Per-file analysis never fails: silence, noise and contradictory evidence
//! are folded into the returned record. These errors cover the two places
//! where failure is real: loading configuration and decoding audio files.

use thiserror::Error;

/// Errors that can occur outside per-file analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration or tag dictionary rejected at load time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Audio decoding error
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// Underlying I/O failure while opening an audio file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::InvalidConfig(format!("malformed JSON: {}", err))
    }
}

impl From<symphonia::core::errors::Error> for AnalysisError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        match err {
            symphonia::core::errors::Error::IoError(e) => AnalysisError::Io(e),
            other => AnalysisError::DecodingError(other.to_string()),
        }
    }
}
