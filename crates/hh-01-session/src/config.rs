//! # Session Configuration
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HH_RTV_PREFIX` | `HH_EnvRTV` | Prefix of the nine runtime value variables |
//! | `HH_TOKEN_TTL_SECS` | `28800` | Lifetime of a minted security token |
//! | `HH_HMAC_SECRET` | all zero | Token signing secret, 64 hex chars |

use crate::adapters::environment::ProcessEnvironment;
use crate::ports::outbound::HostEnvironment;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_RTV_PREFIX: &str = "HH_EnvRTV";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 8 * 60 * 60;

/// Session subsystem configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Runtime values are read from `{rtv_prefix}1` .. `{rtv_prefix}9`.
    pub rtv_prefix: String,
    /// Seconds a minted token stays valid.
    pub token_ttl_secs: u64,
    /// HMAC-SHA256 key used to sign tokens.
    pub hmac_secret: [u8; 32],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rtv_prefix: DEFAULT_RTV_PREFIX.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            hmac_secret: [0u8; 32],
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("rtv_prefix", &self.rtv_prefix)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("hmac_secret", &"<redacted>")
            .finish()
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "SECURITY VIOLATION: HMAC secret is default zero value. \
         Set HH_HMAC_SECRET environment variable or provide in config."
    )]
    InsecureHmacSecret,

    #[error("Token lifetime must be greater than zero")]
    ZeroTokenLifetime,

    #[error("Runtime value prefix must not be empty")]
    EmptyRtvPrefix,
}

impl SessionConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_host(&ProcessEnvironment)
    }

    /// Reads overrides from `host`, keeping defaults for anything missing or
    /// malformed.
    pub fn from_host(host: &dyn HostEnvironment) -> Self {
        let mut config = Self::default();

        if let Some(prefix) = host.var("HH_RTV_PREFIX") {
            config.rtv_prefix = prefix;
        }

        if let Some(ttl) = host.var("HH_TOKEN_TTL_SECS") {
            match ttl.parse() {
                Ok(secs) => config.token_ttl_secs = secs,
                Err(_) => warn!("HH_TOKEN_TTL_SECS is not a number: {}", ttl),
            }
        }

        if let Some(secret_hex) = host.var("HH_HMAC_SECRET") {
            match hex::decode(&secret_hex) {
                Ok(bytes) if bytes.len() == 32 => {
                    config.hmac_secret.copy_from_slice(&bytes);
                    info!("Loaded HMAC secret from environment");
                }
                Ok(_) => warn!("HH_HMAC_SECRET must be 32 bytes (64 hex chars)"),
                Err(_) => warn!("HH_HMAC_SECRET is not valid hex"),
            }
        }

        config
    }

    /// Validate configuration for production readiness.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.hmac_secret == [0u8; 32] {
            return Err(ConfigError::InsecureHmacSecret);
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::ZeroTokenLifetime);
        }
        if self.rtv_prefix.is_empty() {
            return Err(ConfigError::EmptyRtvPrefix);
        }
        Ok(())
    }
}
