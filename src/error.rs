//! Error types for validation, fetching, and per-entry parsing.

use thiserror::Error;

/// A malformed invocation. Always reported before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Search keyword must not be empty")]
    EmptyKeyword,

    #[error("Maximum products per region must be at least 1 (got {0})")]
    InvalidMaxResults(usize),

    #[error("At least one region must be requested")]
    NoRegions,

    #[error("Unknown region '{0}'. Valid regions: us, uk, de, fr, it, es, au")]
    UnknownRegion(String),

    #[error("Timeout must be at least 1 second")]
    InvalidTimeout,
}

/// Process exit status for a failed run: 2 for a malformed invocation, 1 otherwise.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    if err.chain().any(|cause| cause.downcast_ref::<ValidationError>().is_some()) {
        2
    } else {
        1
    }
}

/// Failure to retrieve one region's result page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed with status: {status}")]
    HttpError { status: u16 },

    #[error("network error: {0}")]
    NetworkError(String),
}

impl From<wreq::Error> for FetchError {
    fn from(err: wreq::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::HttpError { status: status.as_u16() }
        } else {
            FetchError::NetworkError(err.to_string())
        }
    }
}

/// Reason a single result card was dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("promotional card")]
    Promotional,

    #[error("missing title")]
    MissingTitle,

    #[error("placeholder title: {0}")]
    PlaceholderTitle(String),

    #[error("title too short: {0}")]
    ShortTitle(String),

    #[error("missing price")]
    MissingPrice,

    #[error("price range: {0}")]
    PriceRange(String),

    #[error("missing link")]
    MissingLink,

    #[error("invalid link: {0}")]
    InvalidUrl(String),
}
