//! Adapters layer.

pub mod field_match;

pub use field_match::FieldMatchProbe;
