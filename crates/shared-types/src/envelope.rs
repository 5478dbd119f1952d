//! # Versioned Envelope
//!
//! The framing convention for ALL persisted kit objects.
//!
//! ```text
//! StartMarker | FormatVersion:u16 | <type fields, version dependent> | EndMarker
//! ```
//!
//! ## Rules
//!
//! - **Versioning**: each type owns its version counter; tags are not shared.
//! - **Rejection**: a tag of 0 or above the type's current version is a fatal
//!   `FormatError::BadVersion` naming the value and the type.
//! - **Migration**: older tags are accepted; the type reads and discards (or
//!   converts) fields its current layout no longer has.
//! - **Corruption**: a wrong end marker is fatal.

use crate::errors::FormatError;
use crate::stream::{BinInStream, BinOutStream};

/// Shared capability set of every persistable type.
pub trait Persistable: Sized {
    /// Type name carried in format errors.
    const TYPE_NAME: &'static str;

    /// Current (and maximum readable) format version.
    const FORMAT_VERSION: u16;

    /// Writes the full envelope for this object.
    fn encode(&self, out: &mut BinOutStream) -> Result<(), FormatError>;

    /// Reads one envelope and returns the object.
    fn decode(input: &mut BinInStream<'_>) -> Result<Self, FormatError>;

    /// Returns the object to its freshly constructed state.
    fn reset(&mut self);

    /// Encodes into a fresh buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut out = BinOutStream::new();
        self.encode(&mut out)?;
        Ok(out.into_bytes())
    }

    /// Decodes a buffer holding exactly one object.
    fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut input = BinInStream::new(bytes);
        let value = Self::decode(&mut input)?;
        input.finish()?;
        Ok(value)
    }
}

/// Writes the start marker and the type's current version.
pub fn write_header<T: Persistable>(out: &mut BinOutStream) {
    out.write_start_marker();
    out.write_u16(T::FORMAT_VERSION);
}

/// Writes the end marker.
pub fn write_trailer(out: &mut BinOutStream) {
    out.write_end_marker();
}

/// Validates the start marker and returns the stored version.
///
/// # Errors
///
/// - `BadMarker` if the first byte is not the start marker
/// - `BadVersion` if the tag is 0 or greater than `T::FORMAT_VERSION`
pub fn read_header<T: Persistable>(input: &mut BinInStream<'_>) -> Result<u16, FormatError> {
    input.check_start_marker()?;
    let version = input.read_u16()?;
    check_version(T::TYPE_NAME, version, T::FORMAT_VERSION)?;
    Ok(version)
}

/// Validates the end marker.
pub fn read_trailer(input: &mut BinInStream<'_>) -> Result<(), FormatError> {
    input.check_end_marker()
}

/// Range check shared by every reader.
pub fn check_version(type_name: &'static str, version: u16, max: u16) -> Result<(), FormatError> {
    if version == 0 || version > max {
        return Err(FormatError::BadVersion {
            type_name,
            version,
            max,
        });
    }
    Ok(())
}
