//! IEEE-754 floating-point codecs at 4 or 8 bytes.
use super::{CodecError, UnsupportedFloatWidthSnafu};
use crate::cursor::{ReadCursor, WriteCursor};

/// Decodes a big-endian IEEE-754 float of `length` bytes.
///
/// Only `binary32` (4 bytes) and `binary64` (8 bytes) exist on the
/// wire; all other lengths fail with
/// [`CodecError::UnsupportedFloatWidth`].
pub fn read_float(cursor: &mut ReadCursor<'_>, length: usize) -> Result<f64, CodecError> {
    match length {
        4 => {
            let bytes = cursor.read_exact(4)?;
            let bits = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            Ok(f32_bits_to_f64(bits))
        }

        8 => {
            let bytes = cursor.read_exact(8)?;
            let bits = u64::from_be_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]);
            Ok(f64::from_bits(bits))
        }

        _ => UnsupportedFloatWidthSnafu { length }.fail(),
    }
}

/// Encodes `value` as a big-endian IEEE-754 float of `length` bytes.
pub fn write_float(
    value: f64,
    cursor: &mut WriteCursor<'_>,
    length: usize,
) -> Result<(), CodecError> {
    match length {
        4 => cursor.write_all(&f64_to_f32_bits(value).to_be_bytes()),
        8 => cursor.write_all(&value.to_bits().to_be_bytes()),
        _ => UnsupportedFloatWidthSnafu { length }.fail(),
    }
}

/// Widens `binary32` bits to an `f64`, carrying NaN payloads
/// across bit-exactly.
///
/// A plain `as` cast may canonicalize NaN payloads, which would
/// break byte-for-byte round trips of 4-byte NaN fields.
fn f32_bits_to_f64(bits: u32) -> f64 {
    const EXPONENT: u32 = 0x7F80_0000;

    if bits & EXPONENT == EXPONENT {
        // Infinity or NaN: rebuild the f64 directly, shifting the
        // 23-bit payload into the top of the 52-bit mantissa.
        let sign = ((bits >> 31) as u64) << 63;
        let mantissa = ((bits & 0x007F_FFFF) as u64) << 29;
        f64::from_bits(sign | 0x7FF0_0000_0000_0000 | mantissa)
    } else {
        f32::from_bits(bits) as f64
    }
}

/// Narrows an `f64` to `binary32` bits, carrying NaN payloads
/// across bit-exactly.
fn f64_to_f32_bits(value: f64) -> u32 {
    const EXPONENT: u64 = 0x7FF0_0000_0000_0000;
    const MANTISSA: u64 = 0x000F_FFFF_FFFF_FFFF;

    let bits = value.to_bits();
    if bits & EXPONENT == EXPONENT && bits & MANTISSA != 0 {
        let sign = ((bits >> 63) as u32) << 31;
        let mut mantissa = ((bits >> 29) & 0x007F_FFFF) as u32;

        // A payload living entirely in the truncated low bits must
        // not collapse into an infinity.
        if mantissa == 0 {
            mantissa = 0x0040_0000;
        }

        sign | 0x7F80_0000 | mantissa
    } else {
        (value as f32).to_bits()
    }
}
