//! Primitive binary encoders and decoders ("codecs") for the
//! KLV wire encodings.
//!
//! Every encoding in this module is a bit-exact match to the rules
//! of MISB ST 0601, MISB ST 1201, and SMPTE 336: a field is always a
//! contiguous **big-endian** byte sequence, and the byte count is
//! always announced by the surrounding Key-Length-Value framing
//! rather than by the field itself.
//!
//! ## The Encodings
//!
//! Family | Rule
//! -------|-----
//! Unsigned integer | Most-significant byte first, 1–8 bytes. Minimum-length encoding has no redundant leading `0x00`.
//! Signed integer | Two's complement of the same width, sign-extended on decode. Minimum-length encoding keeps exactly one sign-carrying lead byte.
//! BER length | ITU-T X.690 short form (`0x00`–`0x7F`) or long form (`0x80 \| N` followed by `N` big-endian bytes, shortest form on encode).
//! BER-OID | 7 bits per byte, big-endian, all bytes except the last with the top bit set. Shortest form on encode; at most 10 bytes for 64-bit values.
//! IEEE-754 float | `binary32` or `binary64`, big-endian. NaN payloads survive 4-byte round trips bit-for-bit.
//! `UFLINT` / `SFLINT` | Fixed-length integers linearly mapped onto a real interval `[min, max]`.
//! `IMAP` | The MISB ST 1201 non-linear mapping, with reserved bit patterns for ±∞, NaNs, and out-of-range markers.
//!
//! Each family lives in its own file; everything is re-exported
//! here. These are pure functions over [`cursors`](crate::cursor) —
//! the polymorphic dispatch and recovery policy on top of them live
//! in [`format`](crate::format).
use snafu::{Backtrace, Snafu};

use crate::types::Tag;

// Expose the codec families as part of this module, while
// keeping them in separate files to reduce clutter.
mod ber;
mod float;
mod imap;
mod int;
pub use ber::*;
pub use float::*;
pub use imap::*;
pub use int::*;

/// Enumeration of errors that may occur while encoding
/// or decoding KLV data.
///
/// Read-path parse errors are absorbed exactly once by the
/// [`format`](crate::format) wrapper and converted into unparsed
/// values; write-path errors always propagate to the caller.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CodecError {
    /// A read would pass the end of the buffer.
    #[snafu(display("needed {needed} more byte(s), but only {remaining} remain"))]
    Truncated { needed: usize, remaining: usize },

    /// A write would exceed the remaining space or the
    /// caller-imposed maximum length.
    #[snafu(display("writing {needed} byte(s) would exceed the {remaining} available"))]
    Overflow { needed: usize, remaining: usize },

    /// A fixed-length format was handed the wrong byte count.
    #[snafu(display("expected a field of {expected} byte(s), got {actual}"))]
    WrongLength { expected: usize, actual: usize },

    /// A variable-length integer does not fit in 64 bits.
    #[snafu(display("decoded value does not fit in 64 bits"))]
    OverflowInDecode,

    /// A floating-point codec was configured with an
    /// unsupported byte width.
    #[snafu(display("unsupported floating-point width of {length} byte(s)"))]
    UnsupportedFloatWidth { length: usize },

    /// A strict-mode mapped format was handed a value outside
    /// its configured interval.
    #[snafu(display("value {value} is outside the mapped interval [{minimum}, {maximum}]"))]
    OutOfRange {
        value: f64,
        minimum: f64,
        maximum: f64,
    },

    /// A typed accessor was invoked on a value of a different kind.
    #[snafu(display("expected a {expected} value, got {actual:?}"))]
    TypeMismatch { expected: Tag, actual: Option<Tag> },

    /// A concrete format advanced its cursor by a different byte
    /// count than it declared. This is a bug in the format, not in
    /// the data.
    #[snafu(display("format declared {computed} byte(s) but moved the cursor by {actual}"))]
    LengthMismatch {
        computed: usize,
        actual: usize,
        backtrace: Backtrace,
    },

    /// Text bytes were not valid UTF-8.
    #[snafu(display("text bytes are not valid UTF-8"))]
    InvalidUtf8,

    /// An IMAP special-value bit pattern from the reserved or
    /// user-defined code space.
    #[snafu(display("IMAP special value pattern {bits:#x} is reserved"))]
    ReservedImap { bits: u64 },
}
