//! # Outbound Ports (Driven Ports)
//!
//! Traits the monitor depends on to decide whether its targets are met.

use crate::domain::errors::ProbeError;
use crate::domain::targets::TargetList;
use async_trait::async_trait;

/// Decides whether a started monitor has reached its goal.
///
/// Called once per poll interval from the worker task. Returning an error
/// does not end the run; the worker logs it and polls again until the wait
/// limit.
#[async_trait]
pub trait CompletionProbe: Send + Sync + 'static {
    /// `Ok(true)` once the condition described by `targets` and `flag` holds.
    async fn probe(&self, targets: &TargetList, flag: bool) -> Result<bool, ProbeError>;
}

/// Reads the current value of a named driver field.
#[async_trait]
pub trait FieldReader: Send + Sync + 'static {
    async fn read_field(&self, name: &str) -> Result<String, ProbeError>;
}
