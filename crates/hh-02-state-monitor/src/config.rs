//! # Monitor Configuration
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HH_MONITOR_POLL_MS` | `1000` | Delay between probe calls |
//! | `HH_MONITOR_WAIT_MS` | `30000` | Wait limit before a run times out |
//! | `HH_MONITOR_SHUTDOWN_REQUEST_MS` | `5000` | Bound on the worker acknowledging shutdown |
//! | `HH_MONITOR_SHUTDOWN_EXIT_MS` | `2000` | Bound on the worker task exiting |

use crate::domain::errors::MonitorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Completion monitor timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub poll_interval_ms: u64,
    pub wait_limit_ms: u64,
    pub shutdown_request_ms: u64,
    pub shutdown_exit_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            wait_limit_ms: 30_000,
            shutdown_request_ms: 5_000,
            shutdown_exit_ms: 2_000,
        }
    }
}

impl MonitorConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads overrides through `lookup`. Values that are not a number of
    /// milliseconds are logged and leave the default in place.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let slots = [
            ("HH_MONITOR_POLL_MS", &mut config.poll_interval_ms),
            ("HH_MONITOR_WAIT_MS", &mut config.wait_limit_ms),
            ("HH_MONITOR_SHUTDOWN_REQUEST_MS", &mut config.shutdown_request_ms),
            ("HH_MONITOR_SHUTDOWN_EXIT_MS", &mut config.shutdown_exit_ms),
        ];
        for (var, slot) in slots {
            if let Some(raw) = lookup(var) {
                override_ms(var, &raw, slot);
            }
        }
        config
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn wait_limit(&self) -> Duration {
        Duration::from_millis(self.wait_limit_ms)
    }

    pub fn shutdown_request(&self) -> Duration {
        Duration::from_millis(self.shutdown_request_ms)
    }

    pub fn shutdown_exit(&self) -> Duration {
        Duration::from_millis(self.shutdown_exit_ms)
    }

    /// All bounds must be non-zero and the exit bound may not exceed the
    /// request bound.
    pub fn validate(&self) -> Result<(), MonitorError> {
        let fields = [
            ("poll_interval_ms", self.poll_interval_ms),
            ("wait_limit_ms", self.wait_limit_ms),
            ("shutdown_request_ms", self.shutdown_request_ms),
            ("shutdown_exit_ms", self.shutdown_exit_ms),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, ms)| *ms == 0) {
            return Err(MonitorError::InvalidConfig(format!("{name} must be non-zero")));
        }
        if self.shutdown_exit_ms > self.shutdown_request_ms {
            return Err(MonitorError::InvalidConfig(format!(
                "shutdown_exit_ms ({}) exceeds shutdown_request_ms ({})",
                self.shutdown_exit_ms, self.shutdown_request_ms
            )));
        }
        Ok(())
    }
}

fn override_ms(var: &str, raw: &str, slot: &mut u64) {
    match raw.trim().parse() {
        Ok(ms) => *slot = ms,
        Err(_) => warn!("{} is not a number of milliseconds: {}", var, raw),
    }
}
