//! # State Monitor Subsystem (hh-02)
//!
//! Asynchronous completion monitors used by drivers to follow device state
//! transitions (power, input, position) without blocking their control
//! thread.
//!
//! ## Architecture
//!
//! - `domain/` - state machine, targets, errors
//! - `ports/` - `CompletionProbe` and `FieldReader` traits
//! - `adapters/` - `FieldMatchProbe`
//! - `monitor.rs` - `AsyncCompletionMonitor` and its worker task
//!
//! ## Invariants
//!
//! | Rule | Description |
//! |------|-------------|
//! | Single writer per edge | Only the worker leaves `Waiting`; only the owner enters `Waiting` or `Idle` |
//! | Owned targets | `start` copies the caller's targets; later caller edits are not seen |
//! | Terminal is sticky | `check_result` never resets a finished run |
//! | Cleanup never fails | Shutdown problems are logged and the monitor still returns to `Idle` |
//!
//! ## Usage
//!
//! ```ignore
//! let mut monitor = AsyncCompletionMonitor::new("ProjectorPower", probe, MonitorConfig::from_env())?;
//! monitor.start(&targets, true)?;
//! loop {
//!     match monitor.check_result()? {
//!         CheckResult::Waiting => do_other_driver_work().await,
//!         done => break done,
//!     }
//! }
//! monitor.cleanup().await;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod monitor;
pub mod ports;

/// Subsystem tag attached to structured log events.
pub const SUBSYSTEM: &str = "hh-02";

pub use adapters::FieldMatchProbe;
pub use config::MonitorConfig;
pub use domain::{
    CheckResult, MonitorError, MonitorState, ProbeError, SharedState, Target, TargetList,
};
pub use monitor::AsyncCompletionMonitor;
pub use ports::{CompletionProbe, FieldReader};
