//! # Hub Telemetry
//!
//! Structured logging for Hearth-Hub subsystems, built on `tracing` and
//! `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hub_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::for_subsystem("02", "state-monitor"))
//!         .expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HH_LOG_LEVEL` | `info` | Filter directive (falls back to `RUST_LOG`) |
//! | `HH_JSON_LOGS` | `false` | JSON formatted output |
//! | `HH_CONSOLE_OUTPUT` | `true` | Write events to stdout |
//! | `HH_SERVICE_NAME` | `hearth-hub` | Service name |
//! | `HH_SUBSYSTEM_ID` | `00` | Subsystem identifier |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Installs logging for the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    logging::init_logging(config)
}

/// Convenience macro for creating a span with subsystem context.
///
/// ```rust,ignore
/// let _span = subsystem_span!("login", subsystem = "hh-01", user = %name).entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_already_initialized() {
        let config = TelemetryConfig {
            console_output: false,
            log_level: "warn".to_string(),
            ..TelemetryConfig::default()
        };
        // The first call may race with other tests installing a subscriber.
        let _ = init_telemetry(&config);
        assert!(matches!(
            init_telemetry(&config),
            Err(TelemetryError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn test_subsystem_span_macro() {
        let span = subsystem_span!("login", subsystem = "hh-01");
        let _entered = span.enter();
    }
}
