// Typed failures from upstream collaborators.
//
// Every network-bound call in the crate returns one of these. The analysis
// pipeline turns them into "signal unavailable" entries; only a failure to
// fetch the subject profile itself reaches the caller.

use thiserror::Error;

/// Failure reported by a collaborator (profile fetch, archive, search, followers).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("account not found")]
    NotFound,
    #[error("not authorized (HTTP {0})")]
    Unauthorized(u16),
    #[error("rate limited (HTTP 429)")]
    RateLimited,
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response shape: {0}")]
    Parse(String),
}

impl FetchError {
    /// Map an HTTP status code to the matching variant.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => FetchError::Unauthorized(status),
            404 => FetchError::NotFound,
            429 => FetchError::RateLimited,
            other => FetchError::Status(other),
        }
    }

    /// The HTTP-like status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::NotFound => Some(404),
            FetchError::Unauthorized(code) => Some(*code),
            FetchError::RateLimited => Some(429),
            FetchError::Status(code) => Some(*code),
            FetchError::Timeout | FetchError::Transport(_) | FetchError::Parse(_) => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Unauthorized(_))
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, FetchError::RateLimited)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::from_status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
