//! # Shared Types Crate
//!
//! The persistence substrate every Hearth-Hub kit object is built on.
//!
//! ## Design Principles
//!
//! - **One framing convention**: every persisted object is wrapped in the
//!   versioned envelope (`StartMarker | u16 version | fields | EndMarker`).
//! - **Per-type versions**: each type owns its format version and migration.
//! - **Fatal format errors**: unknown versions and bad markers are surfaced,
//!   never defaulted.

pub mod conn_cfg;
pub mod envelope;
pub mod errors;
pub mod stream;

pub use conn_cfg::{ConnCfgBase, IpConnCfg, Parity, SerialConnCfg};
pub use envelope::{
    check_version, read_header, read_trailer, write_header, write_trailer, Persistable,
};
pub use errors::FormatError;
pub use stream::{BinInStream, BinOutStream, END_OBJECT_MARKER, START_OBJECT_MARKER};
