//! Error types surfaced at the library boundary.

use thiserror::Error;

/// A contribution payload rejected locally, before any network activity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("place name must not be empty")]
    MissingName,
    #[error("category must not be empty")]
    MissingCategory,
    #[error("coordinates ({lat}, {lon}) are outside the WGS84 range")]
    CoordinatesOutOfRange { lat: f64, lon: f64 },
}

/// Failure while loading places from the backend or the bundled snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error("server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
}

/// Failure while submitting a contribution.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    /// The server refused the contribution; `detail` carries its message
    /// when one could be extracted, otherwise a generic fallback.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
}
