//! Error types for talking to the news backend.
//!
//! Everything above the HTTP layer treats these as "log it and carry on";
//! nothing here is fatal to the UI.

use thiserror::Error;

/// A failed backend call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not the JSON shape we expected.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered 2xx but reported an error in the body.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, ApiError>;
