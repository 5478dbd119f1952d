//! # Security Token
//!
//! Opaque, byte-exact credential issued at login and carried thereafter.
//!
//! ## Invariants
//!
//! - Equality covers `byte_count` and exactly the first `byte_count` bytes.
//! - The token owns its bytes. `set` always copies, so the caller's buffer can
//!   be reused immediately.
//! - A failed `set` leaves the previous payload untouched.
//!
//! ## Persisted layout
//!
//! ```text
//! v2: Start | 2 | ByteCount:u32 | Payload[ByteCount] | End
//! v1: Start | 1 | LegacyHash[16] | ByteCount:u32 | Payload[ByteCount] | End
//! ```

use crate::domain::errors::TokenError;
use shared_types::{
    read_header, read_trailer, write_header, write_trailer, BinInStream, BinOutStream,
    FormatError, Persistable,
};
use std::fmt;
use std::hash::{Hash, Hasher};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the hash field carried by version 1 streams.
pub const LEGACY_HASH_LEN: usize = 16;

/// Authentication credential. The payload is wiped on drop.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecurityToken {
    byte_count: usize,
    payload: Vec<u8>,
}

impl SecurityToken {
    /// Creates an empty token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token holding a copy of `bytes`.
    pub fn from_payload(bytes: &[u8]) -> Self {
        let mut token = Self::new();
        token.copy_in(bytes);
        token
    }

    /// Replaces the payload with the first `byte_count` bytes of `source`.
    ///
    /// # Errors
    ///
    /// `SourceTooSmall` if `source` holds fewer than `byte_count` bytes. The
    /// token keeps its previous value.
    pub fn set(&mut self, source: &[u8], byte_count: usize) -> Result<(), TokenError> {
        if source.len() < byte_count {
            return Err(TokenError::SourceTooSmall {
                requested: byte_count,
                available: source.len(),
            });
        }
        self.copy_in(&source[..byte_count]);
        Ok(())
    }

    /// Clears to the empty credential.
    pub fn reset(&mut self) {
        self.zeroize();
    }

    /// Valid payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.byte_count]
    }

    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    pub fn is_empty(&self) -> bool {
        self.byte_count == 0
    }

    fn copy_in(&mut self, bytes: &[u8]) {
        self.payload.zeroize();
        self.payload.extend_from_slice(bytes);
        self.byte_count = bytes.len();
    }
}

impl PartialEq for SecurityToken {
    fn eq(&self, other: &Self) -> bool {
        self.byte_count == other.byte_count && self.payload() == other.payload()
    }
}

impl Eq for SecurityToken {}

impl Hash for SecurityToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.payload().hash(state);
    }
}

impl fmt::Debug for SecurityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityToken")
            .field("byte_count", &self.byte_count)
            .finish_non_exhaustive()
    }
}

impl Persistable for SecurityToken {
    const TYPE_NAME: &'static str = "SecurityToken";
    const FORMAT_VERSION: u16 = 2;

    fn encode(&self, out: &mut BinOutStream) -> Result<(), FormatError> {
        write_header::<Self>(out);
        out.write_blob(self.payload())?;
        write_trailer(out);
        Ok(())
    }

    fn decode(input: &mut BinInStream<'_>) -> Result<Self, FormatError> {
        let version = read_header::<Self>(input)?;
        if version == 1 {
            input.read_raw(LEGACY_HASH_LEN)?;
        }
        let token = Self::from_payload(input.read_blob()?);
        read_trailer(input)?;
        Ok(token)
    }

    fn reset(&mut self) {
        SecurityToken::reset(self);
    }
}
