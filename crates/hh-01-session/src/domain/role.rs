//! # User Roles
//!
//! Roles are carried, not interpreted. Mapping a role to permissions is the
//! caller's business.

use shared_types::{BinInStream, BinOutStream, FormatError};
use std::fmt;

/// Number of defined roles. Also the on-wire sentinel for "unset".
pub const ROLE_COUNT: u8 = 4;

/// Account role, lowest privilege first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserRole {
    LimitedUser,
    NormalUser,
    PowerUser,
    SystemAdmin,
}

impl UserRole {
    pub const ALL: [UserRole; ROLE_COUNT as usize] = [
        UserRole::LimitedUser,
        UserRole::NormalUser,
        UserRole::PowerUser,
        UserRole::SystemAdmin,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(raw: u8) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    /// Name shown for sessions logged in with this role.
    pub fn display_name(self) -> &'static str {
        match self {
            UserRole::LimitedUser => "Limited User",
            UserRole::NormalUser => "Normal User",
            UserRole::PowerUser => "Power User",
            UserRole::SystemAdmin => "System Administrator",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Writes an optional role, using `ROLE_COUNT` for `None`.
pub(crate) fn write_role(out: &mut BinOutStream, role: Option<UserRole>) {
    out.write_u8(role.map_or(ROLE_COUNT, UserRole::ordinal));
}

pub(crate) fn read_role(input: &mut BinInStream<'_>) -> Result<Option<UserRole>, FormatError> {
    match input.read_u8()? {
        ROLE_COUNT => Ok(None),
        raw => UserRole::from_ordinal(raw)
            .map(Some)
            .ok_or(FormatError::InvalidValue {
                field: "role",
                value: u64::from(raw),
            }),
    }
}
