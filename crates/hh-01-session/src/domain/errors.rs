//! # Domain Errors
//!
//! Error types for the session subsystem.

use crate::domain::context::RTV_COUNT;
use shared_types::FormatError;
use thiserror::Error;

/// Security token errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Source buffer shorter than the requested byte count.
    #[error("Token source too small: requested {requested} bytes, {available} available")]
    SourceTooSmall { requested: usize, available: usize },
}

/// User context errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// Runtime value index outside `0..RTV_COUNT`.
    #[error("Runtime value index {index} out of range (max {max})")]
    IndexOutOfRange { index: usize, max: usize },
}

impl ContextError {
    pub(crate) fn index(index: usize) -> Self {
        ContextError::IndexOutOfRange {
            index,
            max: RTV_COUNT - 1,
        }
    }
}

/// Login and token validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// No account with this login name.
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Password did not match the stored hash.
    #[error("Bad password for account {0}")]
    BadPassword(String),

    /// Token has the wrong shape or its MAC does not verify.
    #[error("Security token rejected: {0}")]
    TokenForged(&'static str),

    /// Token validity window has passed.
    #[error("Security token expired at {expired_at} (now {now})")]
    TokenExpired { expired_at: u64, now: u64 },

    /// Token bytes could not be assembled.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Stored account record is unreadable.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Session registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No open session with this id.
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Context(#[from] ContextError),
}
