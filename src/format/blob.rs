//! Opaque and textual formats: blobs, counted strings, UUIDs.
use super::Format;
use crate::codec::{CodecError, InvalidUtf8Snafu, TypeMismatchSnafu};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::types::{Datum, Tag, Uuid};

/// Opaque bytes of exactly the announced length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BlobFormat {
    fixed_length: usize,
}

impl BlobFormat {
    /// Returns a blob format of `fixed_length` bytes (`0` for
    /// variable length).
    pub const fn new(fixed_length: usize) -> Self {
        Self { fixed_length }
    }

    /// Returns a variable-length blob format.
    pub const fn variable() -> Self {
        Self::new(0)
    }
}

impl Format for BlobFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn tag(&self) -> Tag {
        Tag::Blob
    }

    fn description(&self) -> String {
        match self.fixed_length {
            0 => "raw bytes of variable length".into(),
            length => format!("raw bytes of length {length}"),
        }
    }

    fn read_typed(
        &self,
        cursor: &mut ReadCursor<'_>,
        length: usize,
    ) -> Result<Datum, CodecError> {
        Ok(Datum::Blob(cursor.read_exact(length)?.to_vec()))
    }

    fn write_typed(
        &self,
        datum: &Datum,
        cursor: &mut WriteCursor<'_>,
    ) -> Result<(), CodecError> {
        match datum {
            Datum::Blob(bytes) => cursor.write_all(bytes),
            other => mismatch(Tag::Blob, other),
        }
    }

    fn typed_length(&self, datum: &Datum) -> usize {
        match datum {
            Datum::Blob(bytes) => bytes.len(),
            _ => 0,
        }
    }
}

/// A counted UTF-8 string: raw bytes of exactly the announced
/// length, with trailing NULs preserved on read and none appended
/// on write.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StringFormat {
    fixed_length: usize,
}

impl StringFormat {
    /// Returns a string format of `fixed_length` bytes (`0` for
    /// variable length).
    pub const fn new(fixed_length: usize) -> Self {
        Self { fixed_length }
    }

    /// Returns a variable-length string format.
    pub const fn variable() -> Self {
        Self::new(0)
    }
}

impl Format for StringFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn tag(&self) -> Tag {
        Tag::Text
    }

    fn description(&self) -> String {
        match self.fixed_length {
            0 => "text of variable length".into(),
            length => format!("text of length {length}"),
        }
    }

    fn read_typed(
        &self,
        cursor: &mut ReadCursor<'_>,
        length: usize,
    ) -> Result<Datum, CodecError> {
        let bytes = cursor.read_exact(length)?;
        match core::str::from_utf8(bytes) {
            Ok(text) => Ok(Datum::Text(text.into())),
            Err(_) => InvalidUtf8Snafu.fail(),
        }
    }

    fn write_typed(
        &self,
        datum: &Datum,
        cursor: &mut WriteCursor<'_>,
    ) -> Result<(), CodecError> {
        match datum {
            Datum::Text(text) => cursor.write_all(text.as_bytes()),
            other => mismatch(Tag::Text, other),
        }
    }

    fn typed_length(&self, datum: &Datum) -> usize {
        match datum {
            Datum::Text(text) => text.len(),
            _ => 0,
        }
    }
}

/// A 16-byte UUID, opaque on the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UuidFormat;

impl Format for UuidFormat {
    fn fixed_length(&self) -> usize {
        Uuid::SIZE
    }

    fn tag(&self) -> Tag {
        Tag::Uuid
    }

    fn description(&self) -> String {
        "UUID of length 16".into()
    }

    fn read_typed(
        &self,
        cursor: &mut ReadCursor<'_>,
        _length: usize,
    ) -> Result<Datum, CodecError> {
        let bytes = cursor.read_exact(Uuid::SIZE)?;
        let mut uuid = [0u8; Uuid::SIZE];
        uuid.copy_from_slice(bytes);
        Ok(Datum::Uuid(uuid.into()))
    }

    fn write_typed(
        &self,
        datum: &Datum,
        cursor: &mut WriteCursor<'_>,
    ) -> Result<(), CodecError> {
        match datum {
            Datum::Uuid(uuid) => cursor.write_all(uuid.as_bytes()),
            other => mismatch(Tag::Uuid, other),
        }
    }

    fn typed_length(&self, _datum: &Datum) -> usize {
        Uuid::SIZE
    }
}

/// Fails with a [`CodecError::TypeMismatch`] naming the datum a
/// format `expected` against the one it `got`.
pub(crate) fn mismatch<T>(expected: Tag, got: &Datum) -> Result<T, CodecError> {
    TypeMismatchSnafu {
        expected,
        actual: Some(got.tag()),
    }
    .fail()
}
