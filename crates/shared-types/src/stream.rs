//! # Binary Streams
//!
//! Little-endian output and input streams used by every persistable object.
//! Strings and blobs carry a u32 length prefix.

use crate::errors::FormatError;

/// Marker written before the first field of every object.
pub const START_OBJECT_MARKER: u8 = 0xAC;

/// Marker written after the last field of every object.
pub const END_OBJECT_MARKER: u8 = 0xCA;

/// Growable output stream.
#[derive(Debug, Default, Clone)]
pub struct BinOutStream {
    buf: Vec<u8>,
}

impl BinOutStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Writes raw bytes with no length prefix.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a u32 length prefix followed by the bytes.
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        let len = u32::try_from(bytes.len()).map_err(|_| FormatError::LengthOverflow(bytes.len()))?;
        self.write_u32(len);
        self.write_raw(bytes);
        Ok(())
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) -> Result<(), FormatError> {
        self.write_blob(value.as_bytes())
    }

    pub fn write_start_marker(&mut self) {
        self.write_u8(START_OBJECT_MARKER);
    }

    pub fn write_end_marker(&mut self) {
        self.write_u8(END_OBJECT_MARKER);
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct BinInStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinInStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Reads exactly `n` bytes.
    pub fn read_raw(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < n {
            return Err(FormatError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_raw(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64, FormatError> {
        self.read_array().map(u64::from_le_bytes)
    }

    pub fn read_bool(&mut self) -> Result<bool, FormatError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(FormatError::InvalidValue {
                field: "bool",
                value: u64::from(other),
            }),
        }
    }

    /// Reads a u32 length prefix and that many bytes.
    pub fn read_blob(&mut self) -> Result<&'a [u8], FormatError> {
        let len = self.read_u32()? as usize;
        self.read_raw(len)
    }

    pub fn read_string(&mut self) -> Result<String, FormatError> {
        let bytes = self.read_blob()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| FormatError::InvalidUtf8)
    }

    pub fn check_start_marker(&mut self) -> Result<(), FormatError> {
        self.expect_marker(START_OBJECT_MARKER)
    }

    pub fn check_end_marker(&mut self) -> Result<(), FormatError> {
        self.expect_marker(END_OBJECT_MARKER)
    }

    fn expect_marker(&mut self, expected: u8) -> Result<(), FormatError> {
        let found = self.read_u8()?;
        if found != expected {
            return Err(FormatError::BadMarker { expected, found });
        }
        Ok(())
    }

    /// Fails if any unread bytes remain.
    pub fn finish(self) -> Result<(), FormatError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(FormatError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_are_little_endian() {
        let mut out = BinOutStream::new();
        out.write_u16(0x0102);
        out.write_u32(0x0A0B_0C0D);
        assert_eq!(out.as_bytes(), &[0x02, 0x01, 0x0D, 0x0C, 0x0B, 0x0A]);
    }

    #[test]
    fn test_read_back_mixed_fields() {
        let mut out = BinOutStream::new();
        out.write_start_marker();
        out.write_u64(u64::MAX - 1);
        out.write_bool(true);
        out.write_str("kitchen").unwrap();
        out.write_end_marker();

        let bytes = out.into_bytes();
        let mut input = BinInStream::new(&bytes);
        input.check_start_marker().unwrap();
        assert_eq!(input.read_u64().unwrap(), u64::MAX - 1);
        assert!(input.read_bool().unwrap());
        assert_eq!(input.read_string().unwrap(), "kitchen");
        input.check_end_marker().unwrap();
        input.finish().unwrap();
    }

    #[test]
    fn test_short_read_reports_eof() {
        let mut input = BinInStream::new(&[0x01, 0x02]);
        let err = input.read_u32().unwrap_err();
        assert_eq!(
            err,
            FormatError::UnexpectedEof {
                needed: 4,
                remaining: 2
            }
        );
    }

    #[test]
    fn test_wrong_marker_is_rejected() {
        let mut input = BinInStream::new(&[END_OBJECT_MARKER]);
        let err = input.check_start_marker().unwrap_err();
        assert!(matches!(err, FormatError::BadMarker { expected: 0xAC, .. }));
    }

    #[test]
    fn test_invalid_bool_byte() {
        let mut input = BinInStream::new(&[7]);
        assert!(matches!(
            input.read_bool(),
            Err(FormatError::InvalidValue { field: "bool", value: 7 })
        ));
    }

    #[test]
    fn test_invalid_utf8_string() {
        let mut out = BinOutStream::new();
        out.write_blob(&[0xFF, 0xFE]).unwrap();
        let bytes = out.into_bytes();
        let mut input = BinInStream::new(&bytes);
        assert_eq!(input.read_string(), Err(FormatError::InvalidUtf8));
    }

    #[test]
    fn test_finish_rejects_trailing_bytes() {
        let input = BinInStream::new(&[1, 2, 3]);
        assert_eq!(input.finish(), Err(FormatError::TrailingBytes(3)));
    }
}
