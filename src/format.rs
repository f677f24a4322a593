//! The polymorphic format contract and its generic wrapper.
//!
//! A [`Format`] is an immutable descriptor for exactly one data
//! type under one encoding rule. Concrete formats supply only the
//! small *typed* hooks ([`read_typed`](Format::read_typed),
//! [`write_typed`](Format::write_typed),
//! [`typed_length`](Format::typed_length), and optionally
//! [`print_typed`](Format::print_typed)); the provided
//! [`read`](Format::read), [`write`](Format::write),
//! [`length_of`](Format::length_of), and [`print`](Format::print)
//! methods implement the shared policy once:
//!
//! - Zero-length fields pass through as [`Value::Empty`].
//! - Fixed-length formats reject mismatched byte counts.
//! - A failed parse is logged at error level, then preserved
//!   verbatim as [`Value::Unparsed`] — the codec never drops a
//!   field, so a read-then-write round trip reproduces the
//!   original byte stream exactly.
//! - Every read and write is reconciled against the format's
//!   declared length; a mismatch is a bug in the concrete format
//!   and fails loud with [`CodecError::LengthMismatch`].
//!
//! Formats hold no mutable state: two calls sharing a format but
//! using disjoint buffers are trivially independent.
use snafu::ensure;

use crate::codec::{CodecError, LengthMismatchSnafu, OverflowSnafu, WrongLengthSnafu};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::types::{hex_string, Datum, Tag, Value};

// Expose the concrete formats as part of this module, while
// keeping them in separate files to reduce clutter.
mod blob;
mod int;
mod real;
pub use blob::*;
pub use int::*;
pub use real::*;

/// A KLV data format: the single authority for the three
/// quantities {on-wire bytes, typed value, byte count}.
pub trait Format {
    /// The fixed on-wire byte count of this format, or `0` if
    /// instances vary in length.
    fn fixed_length(&self) -> usize {
        0
    }

    /// The type tag of the data this format produces.
    fn tag(&self) -> Tag;

    /// A human-readable description of this format, for schema
    /// documentation.
    fn description(&self) -> String;

    /// Decodes exactly `length` bytes from `cursor` into a typed
    /// datum.
    ///
    /// Implementations must advance the cursor by exactly
    /// `length` bytes on success; the [`read`](Format::read)
    /// wrapper verifies this.
    fn read_typed(
        &self,
        cursor: &mut ReadCursor<'_>,
        length: usize,
    ) -> Result<Datum, CodecError>;

    /// Encodes `datum` into `cursor`.
    ///
    /// Implementations must advance the cursor by exactly
    /// [`typed_length(datum)`](Format::typed_length) bytes (or the
    /// fixed length) on success; the [`write`](Format::write)
    /// wrapper verifies this.
    fn write_typed(
        &self,
        datum: &Datum,
        cursor: &mut WriteCursor<'_>,
    ) -> Result<(), CodecError>;

    /// The on-wire byte count of `datum` under this format, when
    /// no fixed length applies.
    fn typed_length(&self, datum: &Datum) -> usize;

    /// Renders `datum` for diagnostics; `hint` is the value's
    /// length hint (`0` if unknown).
    fn print_typed(&self, datum: &Datum, hint: usize) -> String {
        let _ = hint;
        datum.to_string()
    }

    /// Reads one field of `length` bytes from `cursor`.
    ///
    /// A `length` of `0` returns [`Value::Empty`] without touching
    /// the cursor. Bytes that fail to parse are consumed anyway
    /// and preserved as [`Value::Unparsed`].
    fn read(&self, cursor: &mut ReadCursor<'_>, length: usize) -> Result<Value, CodecError> {
        if length == 0 {
            return Ok(Value::Empty);
        }

        let fixed = self.fixed_length();
        ensure!(
            fixed == 0 || fixed == length,
            WrongLengthSnafu {
                expected: fixed,
                actual: length,
            }
        );

        let start = cursor.position();
        match self.read_typed(cursor, length) {
            Ok(datum) => {
                let consumed = cursor.position() - start;
                ensure!(
                    consumed == length,
                    LengthMismatchSnafu {
                        computed: length,
                        actual: consumed,
                    }
                );

                Ok(Value::Typed {
                    datum,
                    hint: length,
                })
            }

            Err(error) => {
                tracing::error!(
                    %error,
                    length,
                    format = %self.description(),
                    "failed to parse field; preserving bytes verbatim",
                );

                cursor.seek(start);
                let bytes = cursor.read_exact(length)?.to_vec();
                Ok(Value::unparsed(bytes, length))
            }
        }
    }

    /// Writes `value` to `cursor`, advancing by exactly
    /// [`length_of(value)`](Format::length_of) bytes.
    ///
    /// Fails with [`CodecError::Overflow`] if the value needs more
    /// than `max_length` bytes. Unlike reads, write errors always
    /// propagate: silently dropping or corrupting an outgoing
    /// field is unacceptable.
    fn write(
        &self,
        value: &Value,
        cursor: &mut WriteCursor<'_>,
        max_length: usize,
    ) -> Result<(), CodecError> {
        match value {
            Value::Empty => Ok(()),

            Value::Unparsed { bytes, .. } => {
                ensure!(
                    bytes.len() <= max_length,
                    OverflowSnafu {
                        needed: bytes.len(),
                        remaining: max_length,
                    }
                );

                cursor.write_all(bytes)
            }

            Value::Typed { datum, .. } => {
                let need = self.length_of(value);
                ensure!(
                    need <= max_length,
                    OverflowSnafu {
                        needed: need,
                        remaining: max_length,
                    }
                );

                let start = cursor.position();
                self.write_typed(datum, cursor)?;

                let written = cursor.position() - start;
                ensure!(
                    written == need,
                    LengthMismatchSnafu {
                        computed: need,
                        actual: written,
                    }
                );

                Ok(())
            }
        }
    }

    /// The total on-wire byte count `value` needs under this
    /// format.
    fn length_of(&self, value: &Value) -> usize {
        match value {
            Value::Empty => 0,
            Value::Unparsed { bytes, .. } => bytes.len(),
            Value::Typed { datum, .. } => {
                let fixed = self.fixed_length();
                if fixed != 0 {
                    fixed
                } else {
                    self.typed_length(datum)
                }
            }
        }
    }

    /// Renders `value` for diagnostics.
    fn print(&self, value: &Value) -> String {
        match value {
            Value::Empty => "(empty)".into(),
            Value::Unparsed { bytes, .. } => {
                format!("(unparsed: {})", hex_string(bytes))
            }
            Value::Typed { datum, hint } => self.print_typed(datum, *hint),
        }
    }
}
