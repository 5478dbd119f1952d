//! Ports (Hexagonal Architecture)

pub mod inbound;
pub mod outbound;

pub use inbound::LoginApi;
pub use outbound::{AccountStore, HostEnvironment, TimeSource};
