//! Typed failures for every outbound call the sniper makes.

use thiserror::Error;

/// Failure of a read-only HTTP query (gate check or discovery poll).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("endpoint returned HTTP {status}")]
    NonSuccessStatus { status: u16 },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl FetchError {
    /// Only transport-level failures are worth repeating.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::NonSuccessStatus { status: status.as_u16() }
        } else if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Failure of a purchase submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("ledger rejected submission: {0}")]
    Ledger(String),
}
