//! Adapters (Infrastructure Layer)

pub mod environment;
pub mod memory_store;
pub mod time;

pub use environment::{MapEnvironment, ProcessEnvironment};
pub use memory_store::InMemoryAccountStore;
pub use time::SystemTimeSource;
