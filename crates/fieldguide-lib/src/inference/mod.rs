pub mod client;
pub mod response;

use std::fmt;

/// A remote inference call that did not produce a usable result.
///
/// Covers non-200 statuses, 200 responses with an unexpected JSON shape, and
/// transport failures (no status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: Option<u16>,
    /// Response body, or the transport error message.
    pub detail: String,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "API Error: {status} {}", self.detail),
            None => write!(f, "API Error: {}", self.detail),
        }
    }
}

impl std::error::Error for ApiFailure {}
