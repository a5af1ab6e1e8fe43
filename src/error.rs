//! Error taxonomy for a pin request.
//!
//! Validation and upstream failures abort the request. An empty result is not
//! an error; it is reported as [`EmptyResultWarning`] next to the result.

use std::fmt;

pub const GENERIC_UPSTREAM_MESSAGE: &str = "Failed to fetch pin data";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PinError {
    #[error("Invalid pin URL: {0:?}")]
    InvalidUrl(String),

    #[error("{}", RATE_LIMITED_MESSAGE)]
    UpstreamRateLimited,

    #[error("{0}")]
    UpstreamRequestFailed(String),
}

impl PinError {
    /// Builds an upstream failure, falling back to a generic message when the
    /// provider did not send one.
    pub fn upstream(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => PinError::UpstreamRequestFailed(m),
            _ => PinError::UpstreamRequestFailed(GENERIC_UPSTREAM_MESSAGE.to_string()),
        }
    }

    /// Whether retrying later may help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PinError::UpstreamRateLimited)
    }
}

/// Normalization succeeded but produced no media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyResultWarning;

impl fmt::Display for EmptyResultWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("No downloadable media found")
    }
}
