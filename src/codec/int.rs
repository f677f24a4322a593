//! Big-endian integer codecs.
use snafu::ensure;

use super::{CodecError, OverflowInDecodeSnafu, OverflowSnafu};
use crate::cursor::{ReadCursor, WriteCursor};

/// Decodes a big-endian unsigned integer of `length` bytes.
///
/// Lengths above 8 cannot fit in 64 bits and fail with
/// [`CodecError::OverflowInDecode`].
pub fn read_uint(cursor: &mut ReadCursor<'_>, length: usize) -> Result<u64, CodecError> {
    ensure!(length <= 8, OverflowInDecodeSnafu);

    let mut value = 0u64;
    for byte in cursor.read_exact(length)? {
        value = value << 8 | *byte as u64;
    }

    Ok(value)
}

/// Encodes `value` as a big-endian unsigned integer of exactly
/// `length` bytes, zero-padding slots wider than the value.
///
/// Fails with [`CodecError::Overflow`] if `value` does not fit
/// in `length` bytes.
pub fn write_uint(
    value: u64,
    cursor: &mut WriteCursor<'_>,
    length: usize,
) -> Result<(), CodecError> {
    ensure!(
        uint_length(value) <= length,
        OverflowSnafu {
            needed: uint_length(value),
            remaining: length,
        }
    );

    for i in (0..length).rev() {
        let byte = if i >= 8 { 0 } else { (value >> (8 * i)) as u8 };
        cursor.write_u8(byte)?;
    }

    Ok(())
}

/// The minimum number of bytes needed to encode `value` as a
/// big-endian unsigned integer. Always in `1..=8`.
pub const fn uint_length(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        (bits + 7) / 8
    }
}

/// Decodes a big-endian two's-complement signed integer of
/// `length` bytes, sign-extending to 64 bits.
pub fn read_int(cursor: &mut ReadCursor<'_>, length: usize) -> Result<i64, CodecError> {
    ensure!(length <= 8, OverflowInDecodeSnafu);
    if length == 0 {
        return Ok(0);
    }

    let bytes = cursor.read_exact(length)?;
    let mut value = 0u64;
    for byte in bytes {
        value = value << 8 | *byte as u64;
    }

    // Sign-extend from the top bit of the leading byte.
    if length < 8 && bytes[0] & 0x80 != 0 {
        value |= u64::MAX << (8 * length);
    }

    Ok(value as i64)
}

/// Encodes `value` as a big-endian two's-complement integer of
/// exactly `length` bytes, sign-extending slots wider than the
/// value.
///
/// Fails with [`CodecError::Overflow`] if `value` does not fit
/// in `length` bytes.
pub fn write_int(
    value: i64,
    cursor: &mut WriteCursor<'_>,
    length: usize,
) -> Result<(), CodecError> {
    ensure!(
        int_length(value) <= length,
        OverflowSnafu {
            needed: int_length(value),
            remaining: length,
        }
    );

    let extension = if value < 0 { 0xFF } else { 0x00 };
    for i in (0..length).rev() {
        let byte = if i >= 8 {
            extension
        } else {
            ((value as u64) >> (8 * i)) as u8
        };
        cursor.write_u8(byte)?;
    }

    Ok(())
}

/// The minimum number of bytes needed to encode `value` as a
/// big-endian two's-complement integer while preserving its
/// sign. Always in `1..=8`.
pub const fn int_length(value: i64) -> usize {
    // One sign bit plus however many magnitude bits remain after
    // the leading run of sign-extension bits.
    let magnitude = if value < 0 { !value } else { value };
    let bits = 65 - magnitude.leading_zeros() as usize;
    (bits + 7) / 8
}
