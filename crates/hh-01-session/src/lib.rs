//! # HH-01 Session
//!
//! Identity and session substrate for every hub driver and server component.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - `SecurityToken`: opaque byte-exact credential, minted at login
//! - `UserContext`: one authenticated session (role, token, template, RTVs)
//! - `LoginService`: checks credentials and mints signed tokens
//! - `SessionRegistry`: open sessions, owned by the process entry point
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Token equality | Equal iff byte count and valid bytes match |
//! | 2 | Defensive copy | Tokens never alias caller memory |
//! | 3 | All-or-nothing set | A failed `set` leaves the token unchanged |
//! | 4 | Bounded RTVs | Runtime value indices are `0..=8` |
//! | 5 | Clean reset | A reset context equals a fresh one |
//!
//! ## Module Structure
//!
//! ```text
//! hh-01-session/
//! ├── domain/      # SecurityToken, UserRole, UserAccount, UserContext
//! ├── ports/       # LoginApi + AccountStore, TimeSource, HostEnvironment
//! ├── adapters/    # In-memory store, system clock, environment readers
//! ├── service.rs   # LoginService
//! └── registry.rs  # SessionRegistry
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod service;

/// Subsystem tag attached to structured log events.
pub const SUBSYSTEM: &str = "hh-01";

pub use adapters::{InMemoryAccountStore, MapEnvironment, ProcessEnvironment, SystemTimeSource};
pub use config::{ConfigError, SessionConfig};
pub use domain::{
    ContextError, LoginError, SecurityToken, SessionError, TokenError, UserAccount, UserContext,
    UserRole, ROLE_COUNT, RTV_COUNT,
};
pub use ports::{AccountStore, HostEnvironment, LoginApi, TimeSource};
pub use registry::{SessionId, SessionRegistry};
pub use service::{LoginService, TokenClaims, TOKEN_LEN};
