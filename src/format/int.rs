//! Integer formats: big-endian fixed or minimum-length integers,
//! BER lengths, and BER-OID varints.
use snafu::ensure;

use super::{blob::mismatch, Format};
use crate::codec::{
    ber_length_of, ber_oid_length_of, int_length, read_ber_length, read_ber_oid, read_int,
    read_uint, uint_length, write_ber_length, write_ber_oid, write_int, write_uint, CodecError,
    WrongLengthSnafu,
};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::types::{Datum, Tag};

/// A big-endian unsigned integer of 1–8 bytes.
///
/// A fixed length of `0` selects minimum-length encoding on
/// write; reads take their width from the announced field length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UIntFormat {
    fixed_length: usize,
}

impl UIntFormat {
    /// Returns an unsigned integer format of `fixed_length` bytes
    /// (`0` for minimum-length encoding).
    ///
    /// Panics if `fixed_length` exceeds 8 bytes: wider words
    /// cannot fit in 64 bits.
    pub fn new(fixed_length: usize) -> Self {
        assert!(fixed_length <= 8, "unsigned integers fit in 8 bytes");
        Self { fixed_length }
    }

    /// Returns a minimum-length unsigned integer format.
    pub const fn variable() -> Self {
        Self { fixed_length: 0 }
    }
}

impl Format for UIntFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn tag(&self) -> Tag {
        Tag::UInt
    }

    fn description(&self) -> String {
        match self.fixed_length {
            0 => "unsigned integer of variable length".into(),
            length => format!("unsigned integer of length {length}"),
        }
    }

    fn read_typed(
        &self,
        cursor: &mut ReadCursor<'_>,
        length: usize,
    ) -> Result<Datum, CodecError> {
        Ok(Datum::UInt(read_uint(cursor, length)?))
    }

    fn write_typed(
        &self,
        datum: &Datum,
        cursor: &mut WriteCursor<'_>,
    ) -> Result<(), CodecError> {
        match datum {
            Datum::UInt(value) => {
                let length = match self.fixed_length {
                    0 => uint_length(*value),
                    fixed => fixed,
                };
                write_uint(*value, cursor, length)
            }
            other => mismatch(Tag::UInt, other),
        }
    }

    fn typed_length(&self, datum: &Datum) -> usize {
        match datum {
            Datum::UInt(value) => uint_length(*value),
            _ => 0,
        }
    }
}

/// A big-endian two's-complement signed integer of 1–8 bytes.
///
/// A fixed length of `0` selects minimum-length encoding on
/// write; fixed slots are padded with sign-extension bytes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IntFormat {
    fixed_length: usize,
}

impl IntFormat {
    /// Returns a signed integer format of `fixed_length` bytes
    /// (`0` for minimum-length encoding).
    ///
    /// Panics if `fixed_length` exceeds 8 bytes.
    pub fn new(fixed_length: usize) -> Self {
        assert!(fixed_length <= 8, "signed integers fit in 8 bytes");
        Self { fixed_length }
    }

    /// Returns a minimum-length signed integer format.
    pub const fn variable() -> Self {
        Self { fixed_length: 0 }
    }
}

impl Format for IntFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn tag(&self) -> Tag {
        Tag::Int
    }

    fn description(&self) -> String {
        match self.fixed_length {
            0 => "signed integer of variable length".into(),
            length => format!("signed integer of length {length}"),
        }
    }

    fn read_typed(
        &self,
        cursor: &mut ReadCursor<'_>,
        length: usize,
    ) -> Result<Datum, CodecError> {
        Ok(Datum::Int(read_int(cursor, length)?))
    }

    fn write_typed(
        &self,
        datum: &Datum,
        cursor: &mut WriteCursor<'_>,
    ) -> Result<(), CodecError> {
        match datum {
            Datum::Int(value) => {
                let length = match self.fixed_length {
                    0 => int_length(*value),
                    fixed => fixed,
                };
                write_int(*value, cursor, length)
            }
            other => mismatch(Tag::Int, other),
        }
    }

    fn typed_length(&self, datum: &Datum) -> usize {
        match datum {
            Datum::Int(value) => int_length(*value),
            _ => 0,
        }
    }
}

/// An ITU-T X.690 BER length field. Always variable length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BerFormat;

impl Format for BerFormat {
    fn tag(&self) -> Tag {
        Tag::UInt
    }

    fn description(&self) -> String {
        "BER-encoded unsigned integer".into()
    }

    fn read_typed(
        &self,
        cursor: &mut ReadCursor<'_>,
        length: usize,
    ) -> Result<Datum, CodecError> {
        let start = cursor.position();
        let value = read_ber_length(cursor)?;

        // The encoding announces its own size; disagreement with
        // the field length is malformed data, not a format bug.
        let consumed = cursor.position() - start;
        ensure!(
            consumed == length,
            WrongLengthSnafu {
                expected: length,
                actual: consumed,
            }
        );

        Ok(Datum::UInt(value))
    }

    fn write_typed(
        &self,
        datum: &Datum,
        cursor: &mut WriteCursor<'_>,
    ) -> Result<(), CodecError> {
        match datum {
            Datum::UInt(value) => write_ber_length(*value, cursor),
            other => mismatch(Tag::UInt, other),
        }
    }

    fn typed_length(&self, datum: &Datum) -> usize {
        match datum {
            Datum::UInt(value) => ber_length_of(*value),
            _ => 0,
        }
    }
}

/// A BER-OID varint: 7 bits per byte, big-endian. Always variable
/// length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BerOidFormat;

impl Format for BerOidFormat {
    fn tag(&self) -> Tag {
        Tag::UInt
    }

    fn description(&self) -> String {
        "BER-OID-encoded unsigned integer".into()
    }

    fn read_typed(
        &self,
        cursor: &mut ReadCursor<'_>,
        length: usize,
    ) -> Result<Datum, CodecError> {
        let start = cursor.position();
        let value = read_ber_oid(cursor)?;

        let consumed = cursor.position() - start;
        ensure!(
            consumed == length,
            WrongLengthSnafu {
                expected: length,
                actual: consumed,
            }
        );

        Ok(Datum::UInt(value))
    }

    fn write_typed(
        &self,
        datum: &Datum,
        cursor: &mut WriteCursor<'_>,
    ) -> Result<(), CodecError> {
        match datum {
            Datum::UInt(value) => write_ber_oid(*value, cursor),
            other => mismatch(Tag::UInt, other),
        }
    }

    fn typed_length(&self, datum: &Datum) -> usize {
        match datum {
            Datum::UInt(value) => ber_oid_length_of(*value),
            _ => 0,
        }
    }
}
