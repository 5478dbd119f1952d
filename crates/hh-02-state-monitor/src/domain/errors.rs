//! # Domain Errors
//!
//! Error types for the state monitor subsystem.

use crate::domain::state::MonitorState;
use thiserror::Error;

/// Monitor contract and setup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// `check_result` called before `start`.
    #[error("Monitor {name} is not ready (state {state})")]
    NotReady { name: String, state: MonitorState },

    /// `start` called while a run is active or unreset.
    #[error("Monitor {name} already started (state {state})")]
    AlreadyStarted { name: String, state: MonitorState },

    /// No tokio runtime to host the worker.
    #[error("Monitor {0} created outside a tokio runtime")]
    NoRuntime(String),

    /// Rejected configuration.
    #[error("Invalid monitor configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by a completion probe. The worker logs them and polls
/// again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Target could not be read right now.
    #[error("Target {name} unavailable: {reason}")]
    TargetUnavailable { name: String, reason: String },

    /// Probe backend failed.
    #[error("Probe failed: {0}")]
    Backend(String),
}
