//! Structured error types for backend API operations.
//!
//! These are designed to be displayable in both CLI and TUI contexts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by backend (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("not signed in: {0}")]
    Unauthorized(String),

    #[error("not found: {resource}")]
    NotFound { resource: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("api error: {0}")]
    Other(String),
}

impl ApiError {
    /// True for errors that mean the session is gone and the user must
    /// sign in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// True for transport-level failures worth retrying later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::NetworkUnreachable(_) | ApiError::RateLimited { .. }
        )
    }
}
