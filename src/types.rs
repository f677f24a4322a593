//! Dynamic values produced and consumed by the KLV
//! [`formats`](crate::format).
//!
//! A [`Value`] is a tagged container with three states: empty
//! ("unknown / absent"), unparsed (bytes that failed to parse but
//! must survive verbatim), or typed (one of the primitive
//! [`Datum`] kinds plus an optional length hint).
use core::fmt::{Debug, Display, Formatter, Write};

use crate::codec::{CodecError, TypeMismatchSnafu};

/// Type tags for the primitive [`Datum`] kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Opaque bytes of any length.
    Blob,
    /// 64-bit unsigned integer.
    UInt,
    /// 64-bit signed integer.
    Int,
    /// Double paired with an on-wire byte length.
    Real,
    /// UTF-8 text.
    Text,
    /// 16 opaque bytes.
    Uuid,
}

impl Display for Tag {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Tag::Blob => "blob",
            Tag::UInt => "unsigned integer",
            Tag::Int => "signed integer",
            Tag::Real => "real",
            Tag::Text => "text",
            Tag::Uuid => "UUID",
        };

        formatter.write_str(name)
    }
}

/// A double paired with the on-wire byte length that produced it,
/// or that it will be written at.
///
/// Variable-length float and mapped-integer formats need both
/// halves: the length selects the print precision and lets a
/// decoded value round-trip at its original width. A `length` of
/// `0` means "unspecified".
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Real {
    pub value: f64,
    pub length: usize,
}

impl Real {
    /// Returns a new real with `value` and an on-wire `length`.
    pub const fn new(value: f64, length: usize) -> Self {
        Self { value, length }
    }
}

impl From<f64> for Real {
    /// Wraps `value` with an unspecified length.
    fn from(value: f64) -> Self {
        Self::new(value, 0)
    }
}

impl Display for Real {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.value, formatter)
    }
}

/// A 16-byte universally unique identifier, treated as opaque
/// bytes on the wire.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Size of a UUID, in bytes.
    pub const SIZE: usize = 16;

    /// Null ("empty") UUID initialized to `0`.
    pub const NULL: Self = Self([0; 16]);

    /// Borrows the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = &'static str;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        match <[u8; 16]>::try_from(bytes) {
            Ok(bytes) => Ok(Self(bytes)),
            Err(_) => Err("source bytes must be exactly 16 long"),
        }
    }
}

impl Display for Uuid {
    /// Hyphenated lowercase hexadecimal (`8-4-4-4-12`).
    fn fmt(&self, formatter: &mut Formatter<'_>) -> core::fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                formatter.write_char('-')?;
            }
            write!(formatter, "{byte:02x}")?;
        }

        Ok(())
    }
}

impl Debug for Uuid {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, formatter)
    }
}

/// One primitive typed value: the universe of what a format
/// can produce.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Datum {
    /// Opaque bytes of any length.
    Blob(Vec<u8>),

    /// 64-bit unsigned integer.
    UInt(u64),

    /// 64-bit signed integer.
    Int(i64),

    /// Double with an on-wire byte length.
    Real(Real),

    /// UTF-8 text.
    Text(String),

    /// 16 opaque bytes.
    Uuid(Uuid),
}

impl Datum {
    /// The type tag of this datum.
    pub const fn tag(&self) -> Tag {
        match self {
            Datum::Blob(_) => Tag::Blob,
            Datum::UInt(_) => Tag::UInt,
            Datum::Int(_) => Tag::Int,
            Datum::Real(_) => Tag::Real,
            Datum::Text(_) => Tag::Text,
            Datum::Uuid(_) => Tag::Uuid,
        }
    }
}

impl Display for Datum {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Datum::Blob(bytes) => write_hex(formatter, bytes),
            Datum::UInt(value) => Display::fmt(value, formatter),
            Datum::Int(value) => Display::fmt(value, formatter),
            Datum::Real(value) => Display::fmt(value, formatter),
            Datum::Text(value) => formatter.write_str(value),
            Datum::Uuid(value) => Display::fmt(value, formatter),
        }
    }
}

impl From<Vec<u8>> for Datum {
    fn from(bytes: Vec<u8>) -> Self {
        Datum::Blob(bytes)
    }
}

impl From<u64> for Datum {
    fn from(value: u64) -> Self {
        Datum::UInt(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Int(value)
    }
}

impl From<Real> for Datum {
    fn from(value: Real) -> Self {
        Datum::Real(value)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Real(value.into())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::Text(value)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Text(value.into())
    }
}

impl From<Uuid> for Datum {
    fn from(value: Uuid) -> Self {
        Datum::Uuid(value)
    }
}

/// A dynamic value: the result of reading one KLV field, and the
/// input to writing one.
///
/// The length `hint` carried by the unparsed and typed states is
/// the byte count the value was read at (or should be written at);
/// `0` means "unknown".
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Unknown or absent. Serializes to zero bytes.
    #[default]
    Empty,

    /// Bytes that could not be interpreted, preserved verbatim.
    Unparsed { bytes: Vec<u8>, hint: usize },

    /// A typed datum plus an optional length hint.
    Typed { datum: Datum, hint: usize },
}

impl Value {
    /// Returns a typed value with an unspecified length hint.
    pub fn of(datum: impl Into<Datum>) -> Self {
        Value::Typed {
            datum: datum.into(),
            hint: 0,
        }
    }

    /// Returns a typed value carrying a length `hint`.
    pub fn with_hint(datum: impl Into<Datum>, hint: usize) -> Self {
        Value::Typed {
            datum: datum.into(),
            hint,
        }
    }

    /// Returns an unparsed value preserving `bytes` verbatim.
    ///
    /// Only the format wrapper's fallback path produces these.
    pub(crate) fn unparsed(bytes: Vec<u8>, hint: usize) -> Self {
        Value::Unparsed { bytes, hint }
    }

    /// True iff this value is [`Value::Empty`].
    pub const fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// True iff this value preserves unparseable bytes.
    pub const fn is_unparsed(&self) -> bool {
        matches!(self, Value::Unparsed { .. })
    }

    /// True iff this value holds a typed datum.
    pub const fn is_typed(&self) -> bool {
        matches!(self, Value::Typed { .. })
    }

    /// The value's length hint; `0` means "unknown".
    pub const fn length_hint(&self) -> usize {
        match self {
            Value::Empty => 0,
            Value::Unparsed { hint, .. } => *hint,
            Value::Typed { hint, .. } => *hint,
        }
    }

    /// Borrows the typed datum, if any.
    pub const fn datum(&self) -> Option<&Datum> {
        match self {
            Value::Typed { datum, .. } => Some(datum),
            _ => None,
        }
    }

    /// Borrows the contained unsigned integer.
    pub fn as_uint(&self) -> Result<u64, CodecError> {
        match self.datum() {
            Some(Datum::UInt(value)) => Ok(*value),
            _ => self.mismatch(Tag::UInt),
        }
    }

    /// Borrows the contained signed integer.
    pub fn as_int(&self) -> Result<i64, CodecError> {
        match self.datum() {
            Some(Datum::Int(value)) => Ok(*value),
            _ => self.mismatch(Tag::Int),
        }
    }

    /// Borrows the contained real.
    pub fn as_real(&self) -> Result<Real, CodecError> {
        match self.datum() {
            Some(Datum::Real(value)) => Ok(*value),
            _ => self.mismatch(Tag::Real),
        }
    }

    /// Borrows the contained text.
    pub fn as_text(&self) -> Result<&str, CodecError> {
        match self.datum() {
            Some(Datum::Text(value)) => Ok(value),
            _ => self.mismatch(Tag::Text),
        }
    }

    /// Borrows the contained blob bytes.
    pub fn as_blob(&self) -> Result<&[u8], CodecError> {
        match self.datum() {
            Some(Datum::Blob(bytes)) => Ok(bytes),
            _ => self.mismatch(Tag::Blob),
        }
    }

    /// Borrows the contained UUID.
    pub fn as_uuid(&self) -> Result<Uuid, CodecError> {
        match self.datum() {
            Some(Datum::Uuid(value)) => Ok(*value),
            _ => self.mismatch(Tag::Uuid),
        }
    }

    fn mismatch<T>(&self, expected: Tag) -> Result<T, CodecError> {
        TypeMismatchSnafu {
            expected,
            actual: self.datum().map(Datum::tag),
        }
        .fail()
    }
}

impl Display for Value {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Empty => formatter.write_str("(empty)"),
            Value::Unparsed { bytes, .. } => {
                formatter.write_str("(unparsed: ")?;
                write_hex(formatter, bytes)?;
                formatter.write_str(")")
            }
            Value::Typed { datum, .. } => Display::fmt(datum, formatter),
        }
    }
}

/// Renders `bytes` as a lowercase hexadecimal string, for
/// diagnostics of blobs and unparsed fields.
pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Streams `bytes` into `formatter` as lowercase hexadecimal.
fn write_hex(formatter: &mut Formatter<'_>, bytes: &[u8]) -> core::fmt::Result {
    bytes
        .iter()
        .try_for_each(|byte| write!(formatter, "{byte:02x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_default() {
        assert_eq!(Value::Empty, Value::default());
        assert!(Value::default().is_empty());
        assert_eq!(0, Value::default().length_hint());
        assert_eq!("(empty)", Value::default().to_string());
    }

    #[test]
    fn typed_accessors() {
        assert_eq!(300, Value::of(300u64).as_uint().expect("uint"));
        assert_eq!(-7, Value::of(-7i64).as_int().expect("int"));
        assert_eq!("cake", Value::of("cake").as_text().expect("text"));
        assert_eq!(
            Real::new(1.5, 4),
            Value::of(Real::new(1.5, 4)).as_real().expect("real")
        );
        assert_eq!(
            &[1u8, 2, 3][..],
            Value::of(vec![1u8, 2, 3]).as_blob().expect("blob")
        );
        assert_eq!(
            Uuid::NULL,
            Value::of(Uuid::NULL).as_uuid().expect("uuid")
        );
    }

    #[test]
    fn accessors_mismatch() {
        let value = Value::of(300u64);
        let error = value.as_text().expect_err("mismatch");
        assert!(matches!(
            error,
            CodecError::TypeMismatch {
                expected: Tag::Text,
                actual: Some(Tag::UInt),
                ..
            }
        ));

        // Empty and unparsed values have no tag at all.
        let error = Value::Empty.as_uint().expect_err("mismatch");
        assert!(matches!(
            error,
            CodecError::TypeMismatch { actual: None, .. }
        ));
    }

    #[test]
    fn hints_are_carried() {
        assert_eq!(4, Value::with_hint(1u64, 4).length_hint());
        assert_eq!(3, Value::unparsed(vec![1, 2, 3], 3).length_hint());
    }

    #[test]
    fn uuid_renders_hyphenated() {
        let uuid = Uuid::from([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0x01, 0x23, 0x45, 0x67, 0x89, 0xAB,
            0xCD, 0xEF,
        ]);
        assert_eq!("01234567-89ab-cdef-0123-456789abcdef", uuid.to_string());
    }

    #[test]
    fn unparsed_renders_hex() {
        let value = Value::unparsed(vec![0xDE, 0xAD, 0xBE, 0xEF], 4);
        assert_eq!("(unparsed: deadbeef)", value.to_string());
    }

    #[test]
    fn hex_encoding() {
        assert_eq!("00ff10", hex_string(&[0x00, 0xFF, 0x10]));
        assert_eq!("", hex_string(&[]));
    }
}
