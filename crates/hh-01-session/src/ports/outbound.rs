//! Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies the session subsystem needs from its host.

use crate::domain::account::UserAccount;
use shared_types::FormatError;

/// Persistent account records.
pub trait AccountStore: Send + Sync {
    /// Loads the account for `login_name`, if one exists.
    fn find_account(&self, login_name: &str) -> Result<Option<UserAccount>, FormatError>;

    /// Inserts or replaces an account.
    fn store_account(&self, account: &UserAccount) -> Result<(), FormatError>;

    /// Removes an account. Returns true if it existed.
    fn remove_account(&self, login_name: &str) -> bool;
}

/// Wall clock.
pub trait TimeSource: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> u64;
}

/// Host environment variables.
pub trait HostEnvironment {
    fn var(&self, name: &str) -> Option<String>;
}
