//! Domain layer: state machine, targets and errors.

pub mod errors;
pub mod state;
pub mod targets;

pub use errors::{MonitorError, ProbeError};
pub use state::{CheckResult, MonitorState, SharedState};
pub use targets::{Target, TargetList};
