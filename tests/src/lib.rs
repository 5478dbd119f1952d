//! # Hearth-Hub Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Envelope and token benchmarks
//! └── src/integration/  # Cross-subsystem flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hh-tests
//! cargo bench -p hh-tests
//! ```

pub mod integration;
