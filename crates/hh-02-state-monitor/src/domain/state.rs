//! # Monitor State Machine
//!
//! ```text
//! Idle --start--> Waiting --worker--> Complete
//!                    |
//!                    +---deadline---> Timeout
//!
//! any --cleanup--> Idle
//! ```
//!
//! Only the worker moves the state out of `Waiting`. Only the owner moves
//! it into `Waiting` or back to `Idle`.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle state of a completion monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum MonitorState {
    #[default]
    Idle = 0,
    Waiting = 1,
    Complete = 2,
    Timeout = 3,
}

impl MonitorState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => MonitorState::Waiting,
            2 => MonitorState::Complete,
            3 => MonitorState::Timeout,
            _ => MonitorState::Idle,
        }
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Answer to a poll of a started monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    Waiting,
    Complete,
    Timeout,
}

/// State cell shared between the owner and its worker.
///
/// Stores use `Release` and loads use `Acquire`.
#[derive(Debug, Clone, Default)]
pub struct SharedState(Arc<AtomicU8>);

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> MonitorState {
        MonitorState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, state: MonitorState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Moves `from` -> `to`. Returns false if the state was not `from`.
    pub fn transition(&self, from: MonitorState, to: MonitorState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
