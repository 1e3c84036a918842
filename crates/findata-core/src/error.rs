//! Error types for data operations.
//!
//! This module defines [`DataError`], which covers all error cases that can
//! occur when fetching, parsing, or caching financial data, and
//! [`FaultKind`], the transient/permanent classification the retry policy
//! acts on.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// A provider API returned a failure response.
    ///
    /// `status` carries the HTTP status code when one was observed; it is the
    /// only input to retry classification.
    #[error("API error from {provider}: {message}")]
    Api {
        /// The provider that returned the failure.
        provider: String,
        /// Description of the failure.
        message: String,
        /// HTTP status code of the response, when available.
        status: Option<u16>,
    },

    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The fetch succeeded transport-wise but returned zero observations.
    ///
    /// Never retried and never cached.
    #[error("No data returned for {0}")]
    NoData(String),

    /// Error interacting with the cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Error parsing data from a provider or from the cache.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Classification of a failed operation for retry purposes.
///
/// | Kind | Retried? |
/// |------|----------|
/// | `Transient` | Yes, up to the attempt budget |
/// | `Permanent` | No, surfaced immediately |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaultKind {
    /// Server-side fault (HTTP 5xx) expected to resolve with time.
    Transient,
    /// Client-side or validation fault, or any error without a classifiable
    /// status. Retrying will not help.
    Permanent,
}

impl DataError {
    /// Returns the HTTP status code carried by this error, if any.
    ///
    /// Only [`DataError::Api`] can carry one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Classifies this error for retry purposes.
    ///
    /// A status of 500 or above is a server-side fault and therefore
    /// [`FaultKind::Transient`]. Everything else, including errors that carry
    /// no status at all, is [`FaultKind::Permanent`].
    #[must_use]
    pub fn fault_kind(&self) -> FaultKind {
        match self.status() {
            Some(status) if status >= 500 => FaultKind::Transient,
            _ => FaultKind::Permanent,
        }
    }
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
