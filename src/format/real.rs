//! Real-valued formats: IEEE-754 floats and the mapped-integer
//! encodings (`UFLINT`, `SFLINT`, `IMAP`).
//!
//! Each of these produces a [`Real`]: the decoded double paired
//! with the on-wire byte length, so variable-width values
//! round-trip at their original width and print at a precision
//! matched to it.
use super::{blob::mismatch, Format};
use crate::codec::{
    read_float, read_imap, read_sflint, read_uflint, write_float, write_imap, write_sflint,
    write_uflint, CodecError,
};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::types::{Datum, Real, Tag};

/// An IEEE-754 float of exactly 4 (`binary32`) or 8 (`binary64`)
/// bytes, big-endian.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FloatFormat {
    fixed_length: usize,
}

impl FloatFormat {
    /// Returns a float format of `fixed_length` bytes.
    ///
    /// Panics unless `fixed_length` is 4 or 8: no other IEEE-754
    /// interchange width exists on a KLV wire.
    pub fn new(fixed_length: usize) -> Self {
        assert!(
            fixed_length == 4 || fixed_length == 8,
            "IEEE-754 fields are 4 or 8 bytes"
        );
        Self { fixed_length }
    }
}

impl Format for FloatFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn tag(&self) -> Tag {
        Tag::Real
    }

    fn description(&self) -> String {
        format!("IEEE-754 float of length {}", self.fixed_length)
    }

    fn read_typed(
        &self,
        cursor: &mut ReadCursor<'_>,
        length: usize,
    ) -> Result<Datum, CodecError> {
        let value = read_float(cursor, length)?;
        Ok(Datum::Real(Real::new(value, length)))
    }

    fn write_typed(
        &self,
        datum: &Datum,
        cursor: &mut WriteCursor<'_>,
    ) -> Result<(), CodecError> {
        match datum {
            Datum::Real(real) => write_float(real.value, cursor, self.fixed_length),
            other => mismatch(Tag::Real, other),
        }
    }

    fn typed_length(&self, _datum: &Datum) -> usize {
        self.fixed_length
    }

    fn print_typed(&self, datum: &Datum, _hint: usize) -> String {
        let digits = if self.fixed_length == 4 { 8 } else { 17 };
        print_real(datum, digits)
    }
}

/// Shared configuration of the three mapped-integer formats.
macro_rules! mapped_format {
    (
        $(#[$meta:meta])*
        $type_name:ident,
        $read:ident,
        $write:ident,
        $label:literal,
        $bits:expr
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq)]
        pub struct $type_name {
            fixed_length: usize,
            minimum: f64,
            maximum: f64,
            strict: bool,
        }

        impl $type_name {
            /// Returns a new format mapping `fixed_length`-byte
            /// integers onto `[minimum, maximum]`. A length of `0`
            /// means the caller supplies the width through each
            /// value's [`Real::length`].
            ///
            /// Panics if the interval is empty or `fixed_length`
            /// exceeds 8 bytes.
            pub fn new(minimum: f64, maximum: f64, fixed_length: usize) -> Self {
                assert!(maximum > minimum, "mapped interval must not be empty");
                assert!(fixed_length <= 8, "mapped integers fit in 8 bytes");
                Self {
                    fixed_length,
                    minimum,
                    maximum,
                    strict: false,
                }
            }

            /// Returns this format in strict mode: values outside
            /// the interval fail with
            /// [`CodecError::OutOfRange`] instead of clamping.
            pub fn strict(mut self) -> Self {
                self.strict = true;
                self
            }

            /// The interval bounds.
            pub const fn bounds(&self) -> (f64, f64) {
                (self.minimum, self.maximum)
            }

            fn write_length(&self, real: &Real) -> usize {
                match self.fixed_length {
                    0 => real.length,
                    fixed => fixed,
                }
            }
        }

        impl Format for $type_name {
            fn fixed_length(&self) -> usize {
                self.fixed_length
            }

            fn tag(&self) -> Tag {
                Tag::Real
            }

            fn description(&self) -> String {
                match self.fixed_length {
                    0 => format!(
                        concat!($label, " in [{}, {}] of variable length"),
                        self.minimum, self.maximum
                    ),
                    length => format!(
                        concat!($label, " in [{}, {}] of length {}"),
                        self.minimum, self.maximum, length
                    ),
                }
            }

            fn read_typed(
                &self,
                cursor: &mut ReadCursor<'_>,
                length: usize,
            ) -> Result<Datum, CodecError> {
                let value = $read(cursor, length, self.minimum, self.maximum)?;
                Ok(Datum::Real(Real::new(value, length)))
            }

            fn write_typed(
                &self,
                datum: &Datum,
                cursor: &mut WriteCursor<'_>,
            ) -> Result<(), CodecError> {
                match datum {
                    Datum::Real(real) => $write(
                        real.value,
                        cursor,
                        self.write_length(real),
                        self.minimum,
                        self.maximum,
                        self.strict,
                    ),
                    other => mismatch(Tag::Real, other),
                }
            }

            fn typed_length(&self, datum: &Datum) -> usize {
                match datum {
                    Datum::Real(real) => real.length,
                    _ => 0,
                }
            }

            fn print_typed(&self, datum: &Datum, hint: usize) -> String {
                let length = match (self.fixed_length, datum) {
                    (0, Datum::Real(real)) if real.length != 0 => real.length,
                    (0, _) => hint,
                    (fixed, _) => fixed,
                };

                let digits = match length {
                    0 => 17,
                    length => sig_digits($bits(length)),
                };

                print_real(datum, digits)
            }
        }
    };
}

mapped_format!(
    /// `UFLINT(minimum, maximum, length)`: an unsigned
    /// `length`-byte integer linearly mapped onto
    /// `[minimum, maximum]`.
    UflintFormat,
    read_uflint,
    write_uflint,
    "unsigned linearly-mapped real",
    |length: usize| 8 * length
);

mapped_format!(
    /// `SFLINT(minimum, maximum, length)`: a signed `length`-byte
    /// integer mapped symmetrically onto `[minimum, maximum]`,
    /// with zero at integer `0`.
    SflintFormat,
    read_sflint,
    write_sflint,
    "signed linearly-mapped real",
    |length: usize| 8 * length
);

mapped_format!(
    /// `IMAP(minimum, maximum, length)`: the MISB ST 1201
    /// non-linear mapping, with one bit reserved for the
    /// special-value code space.
    ImapFormat,
    read_imap,
    write_imap,
    "ST 1201 IMAP-encoded real",
    |length: usize| 8 * length - 1
);

/// Significant decimal digits resolvable by `bits` of integer
/// code space: `ceil(bits * log10(2))`.
fn sig_digits(bits: usize) -> usize {
    (bits * 30103).div_ceil(100_000)
}

fn print_real(datum: &Datum, digits: usize) -> String {
    match datum {
        Datum::Real(real) => format_sig(real.value, digits),
        other => other.to_string(),
    }
}

/// Formats `value` with `digits` significant decimal digits,
/// switching to scientific notation outside a comfortable
/// magnitude window.
fn format_sig(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }

    let magnitude = value.abs().log10().floor() as i32;
    if magnitude >= digits as i32 || magnitude < -4 {
        format!("{:.*e}", digits.saturating_sub(1), value)
    } else {
        let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
        format!("{value:.decimals$}")
    }
}
