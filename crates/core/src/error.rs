//! Fetch error model.

use thiserror::Error;

/// Result type returned by every remote fetch.
pub type FetchResult<T> = Result<T, FetchError>;

/// Failure of a single remote fetch.
///
/// The `Display` output is the normalized, human-readable message that ends up
/// in error notifications, so both variants keep enough detail to tell a
/// connectivity problem apart from a server-reported one.
///
/// A missing category or supplier referenced by id is *not* a fetch error:
/// lookups return `None` instead (see [`crate::find_by_id`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No response reached the client (network unavailable, connection reset, ...).
    #[error("An error occurred: {detail}")]
    Transport { detail: String },

    /// The backend answered with an unsuccessful status code.
    #[error("Backend returned code {status}: {message}")]
    Backend { status: u16, message: String },
}

impl FetchError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }

    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Whether the failure happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// HTTP status reported by the backend, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { .. } => None,
            Self::Backend { status, .. } => Some(*status),
        }
    }
}
