//! BER length and BER-OID varint codecs.
use snafu::ensure;

use super::{read_uint, uint_length, write_uint, CodecError, OverflowInDecodeSnafu};
use crate::cursor::{ReadCursor, WriteCursor};

/// Decodes an ITU-T X.690 BER length field.
///
/// Short form (`0x00`–`0x7F`) is the value itself; long form is a
/// header byte `0x80 | N` followed by `N` big-endian value bytes.
/// The indeterminate form (`0x80`, N = 0) and long forms wider than
/// 8 value bytes are rejected. Non-shortest long forms are accepted.
pub fn read_ber_length(cursor: &mut ReadCursor<'_>) -> Result<u64, CodecError> {
    let first = cursor.read_u8()?;
    if first & 0x80 == 0 {
        return Ok(first as u64);
    }

    let count = (first & 0x7F) as usize;
    ensure!(count >= 1 && count <= 8, OverflowInDecodeSnafu);
    read_uint(cursor, count)
}

/// Encodes `value` as a shortest-form BER length field.
pub fn write_ber_length(value: u64, cursor: &mut WriteCursor<'_>) -> Result<(), CodecError> {
    if value < 0x80 {
        return cursor.write_u8(value as u8);
    }

    let count = uint_length(value);
    cursor.write_u8(0x80 | count as u8)?;
    write_uint(value, cursor, count)
}

/// The number of bytes a shortest-form BER length encoding of
/// `value` occupies.
pub const fn ber_length_of(value: u64) -> usize {
    if value < 0x80 {
        1
    } else {
        1 + uint_length(value)
    }
}

/// Decodes a BER-OID varint: 7 bits per byte, big-endian, every
/// byte except the last with its top bit set.
///
/// Values wider than 64 bits fail with
/// [`CodecError::OverflowInDecode`].
pub fn read_ber_oid(cursor: &mut ReadCursor<'_>) -> Result<u64, CodecError> {
    let mut value = 0u64;
    loop {
        let byte = cursor.read_u8()?;

        // The next shift must not drop accumulated bits.
        ensure!(value >> 57 == 0, OverflowInDecodeSnafu);
        value = value << 7 | (byte & 0x7F) as u64;

        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
}

/// Encodes `value` as a shortest-form BER-OID varint (no leading
/// `0x80` byte).
pub fn write_ber_oid(value: u64, cursor: &mut WriteCursor<'_>) -> Result<(), CodecError> {
    let count = ber_oid_length_of(value);
    for i in (0..count).rev() {
        let mut byte = (value >> (7 * i)) as u8 & 0x7F;
        if i > 0 {
            byte |= 0x80;
        }
        cursor.write_u8(byte)?;
    }

    Ok(())
}

/// The number of bytes a shortest-form BER-OID encoding of `value`
/// occupies. Always in `1..=10`.
pub const fn ber_oid_length_of(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        (bits + 6) / 7
    }
}
