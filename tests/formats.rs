#![cfg(test)]
//! Integration tests of the full format dispatch path: every
//! format exercised through the [`Format`] trait object surface,
//! with literal wire vectors for the boundary encodings.

use pretty_assertions::assert_eq;

use klv::cursor::{ReadCursor, WriteCursor};
use klv::format::{
    BerFormat, BerOidFormat, BlobFormat, FloatFormat, Format, ImapFormat, IntFormat, SflintFormat,
    StringFormat, UflintFormat, UIntFormat, UuidFormat,
};
use klv::types::{Real, Uuid, Value};

/// Writes `value` through `format` and returns the emitted bytes,
/// asserting the cursor advanced by exactly `length_of`.
fn encode(format: &dyn Format, value: &Value) -> Vec<u8> {
    let need = format.length_of(value);
    let mut buffer = vec![0u8; need.max(1)];
    let mut cursor = WriteCursor::new(&mut buffer);
    format.write(value, &mut cursor, need).expect("encoded");
    assert_eq!(need, cursor.position());
    buffer.truncate(need);
    buffer
}

/// Reads `bytes` through `format` as one field.
fn decode(format: &dyn Format, bytes: &[u8]) -> Value {
    let mut cursor = ReadCursor::new(bytes);
    let value = format.read(&mut cursor, bytes.len()).expect("decoded");
    assert_eq!(bytes.len(), cursor.position());
    value
}

#[test]
fn ber_length_boundaries() {
    let format = BerFormat;
    let cases: &[(u64, &[u8])] = &[
        (0, &[0x00]),
        (127, &[0x7F]),
        (128, &[0x81, 0x80]),
        (256, &[0x82, 0x01, 0x00]),
    ];

    for (value, bytes) in cases {
        assert_eq!(bytes.to_vec(), encode(&format, &Value::of(*value)));
        assert_eq!(*value, decode(&format, bytes).as_uint().expect("uint"));
    }
}

#[test]
fn ber_oid_boundaries() {
    let format = BerOidFormat;
    let cases: &[(u64, &[u8])] = &[
        (0, &[0x00]),
        (127, &[0x7F]),
        (128, &[0x81, 0x00]),
        (16383, &[0xFF, 0x7F]),
        (16384, &[0x81, 0x80, 0x00]),
    ];

    for (value, bytes) in cases {
        assert_eq!(bytes.to_vec(), encode(&format, &Value::of(*value)));
        assert_eq!(*value, decode(&format, bytes).as_uint().expect("uint"));
    }
}

#[test]
fn signed_minimum_length_boundaries() {
    let format = IntFormat::variable();
    let cases: &[(i64, &[u8])] = &[
        (-1, &[0xFF]),
        (127, &[0x7F]),
        (128, &[0x00, 0x80]),
        (-128, &[0x80]),
        (-129, &[0xFF, 0x7F]),
    ];

    for (value, bytes) in cases {
        assert_eq!(bytes.to_vec(), encode(&format, &Value::of(*value)));
        assert_eq!(*value, decode(&format, bytes).as_int().expect("int"));
    }
}

#[test]
fn float_boundaries() {
    let format = FloatFormat::new(4);
    let value = Value::of(Real::new(1.0, 4));
    assert_eq!(vec![0x3F, 0x80, 0x00, 0x00], encode(&format, &value));
    assert_eq!(
        1.0,
        decode(&format, &[0x3F, 0x80, 0x00, 0x00])
            .as_real()
            .expect("real")
            .value
    );

    // NaN bit patterns survive a read-then-write byte-for-byte.
    let nan_bytes = [0x7F, 0xC0, 0xBE, 0xEF];
    let nan = decode(&format, &nan_bytes);
    assert!(nan.as_real().expect("real").value.is_nan());
    assert_eq!(nan_bytes.to_vec(), encode(&format, &nan));
}

#[test]
fn uflint_midpoint_boundary() {
    let format = UflintFormat::new(0.0, 100.0, 2);
    let bytes = encode(&format, &Value::of(Real::new(50.0, 2)));
    let code = u16::from_be_bytes([bytes[0], bytes[1]]);
    assert!((0x7FFF..=0x8000).contains(&code));

    let decoded = decode(&format, &bytes).as_real().expect("real");
    assert!((decoded.value - 50.0).abs() <= 100.0 / 65535.0);
}

#[test]
fn imap_boundaries() {
    let format = ImapFormat::new(-900.0, 19000.0, 2);

    // +∞ uses the ST 1201 reserved pattern and round-trips
    // bit-for-bit.
    let infinity = Value::of(Real::new(f64::INFINITY, 2));
    assert_eq!(vec![0xC8, 0x00], encode(&format, &infinity));
    assert_eq!(
        f64::INFINITY,
        decode(&format, &[0xC8, 0x00]).as_real().expect("real").value
    );

    // 0.0 lands on an exact code point in this interval.
    let zero = Value::of(Real::new(0.0, 2));
    let bytes = encode(&format, &zero);
    assert_eq!(vec![0x03, 0x84], bytes);
    assert_eq!(0.0, decode(&format, &bytes).as_real().expect("real").value);
}

#[test]
fn every_format_round_trips() {
    let uuid = Uuid::from(*b"\x01\x23\x45\x67\x89\xAB\xCD\xEF\x01\x23\x45\x67\x89\xAB\xCD\xEF");
    let cases: Vec<(Box<dyn Format>, Vec<Value>)> = vec![
        (
            Box::new(BlobFormat::variable()),
            vec![Value::of(vec![0u8]), Value::of(vec![1u8, 2, 3, 4, 5])],
        ),
        (
            Box::new(StringFormat::variable()),
            vec![Value::of("cake"), Value::of("metadata\0\0")],
        ),
        (
            Box::new(UIntFormat::variable()),
            vec![Value::of(0u64), Value::of(255u64), Value::of(u64::MAX)],
        ),
        (
            Box::new(UIntFormat::new(4)),
            vec![Value::of(7u64), Value::of(0xFFFF_FFFFu64)],
        ),
        (
            Box::new(IntFormat::variable()),
            vec![Value::of(-1i64), Value::of(128i64), Value::of(i64::MIN)],
        ),
        (
            Box::new(BerFormat),
            vec![Value::of(5u64), Value::of(500u64)],
        ),
        (
            Box::new(BerOidFormat),
            vec![Value::of(98u64), Value::of(16500u64)],
        ),
        (
            Box::new(FloatFormat::new(8)),
            vec![
                Value::of(Real::new(core::f64::consts::PI, 8)),
                Value::of(Real::new(-1e300, 8)),
            ],
        ),
        (Box::new(UuidFormat), vec![Value::of(uuid)]),
    ];

    for (format, values) in &cases {
        for value in values {
            let bytes = encode(format.as_ref(), value);
            let decoded = decode(format.as_ref(), &bytes);
            assert_eq!(
                value.datum(),
                decoded.datum(),
                "{} did not round-trip",
                format.description()
            );

            // Re-encoding the decoded value reproduces the bytes.
            assert_eq!(bytes, encode(format.as_ref(), &decoded));
        }
    }
}

#[test]
fn mapped_formats_round_trip_within_one_step() {
    let cases: Vec<(Box<dyn Format>, f64, f64, f64)> = vec![
        (
            Box::new(UflintFormat::new(0.0, 100.0, 2)),
            0.0,
            100.0,
            100.0 / 65535.0,
        ),
        (
            Box::new(SflintFormat::new(-180.0, 180.0, 2)),
            -180.0,
            180.0,
            180.0 / 32767.0,
        ),
        (
            Box::new(ImapFormat::new(-900.0, 19000.0, 2)),
            -900.0,
            19000.0,
            1.0,
        ),
    ];

    for (format, minimum, maximum, step) in &cases {
        for fraction in [0.0, 0.1, 0.25, 0.5, 0.75, 0.99, 1.0] {
            let value = minimum + fraction * (maximum - minimum);
            let encoded = encode(format.as_ref(), &Value::of(Real::new(value, 2)));
            let decoded = decode(format.as_ref(), &encoded).as_real().expect("real");
            assert!(
                (decoded.value - value).abs() <= *step,
                "{}: {value} decoded as {}",
                format.description(),
                decoded.value
            );
        }
    }
}

#[test]
fn zero_length_reads_pass_through_every_format() {
    let formats: Vec<Box<dyn Format>> = vec![
        Box::new(BlobFormat::variable()),
        Box::new(StringFormat::variable()),
        Box::new(UIntFormat::new(4)),
        Box::new(IntFormat::variable()),
        Box::new(BerFormat),
        Box::new(BerOidFormat),
        Box::new(FloatFormat::new(8)),
        Box::new(UflintFormat::new(0.0, 1.0, 2)),
        Box::new(SflintFormat::new(-1.0, 1.0, 2)),
        Box::new(ImapFormat::new(0.0, 1.0, 2)),
        Box::new(UuidFormat),
    ];

    let bytes = [0xAAu8; 4];
    for format in &formats {
        let mut cursor = ReadCursor::new(&bytes);
        let value = format.read(&mut cursor, 0).expect("decoded");
        assert!(value.is_empty(), "{}", format.description());
        assert_eq!(0, cursor.position());
        assert_eq!(0, format.length_of(&value));

        // Writing the empty value advances by zero bytes.
        let mut buffer = [0u8; 4];
        let mut writer = WriteCursor::new(&mut buffer);
        format.write(&value, &mut writer, 4).expect("encoded");
        assert_eq!(0, writer.position());
    }
}

#[test]
fn unparsed_bytes_are_preserved_exactly() {
    // Invalid UTF-8 through a string format.
    let format = StringFormat::variable();
    let bytes = [0x74, 0x65, 0x78, 0xF4, 0x90];
    let value = decode(&format, &bytes);
    assert!(value.is_unparsed());
    assert_eq!(bytes.len(), format.length_of(&value));
    assert_eq!(bytes.to_vec(), encode(&format, &value));

    // A reserved IMAP pattern through an IMAP format.
    let format = ImapFormat::new(0.0, 100.0, 2);
    let bytes = [0x81, 0x23];
    let value = decode(&format, &bytes);
    assert!(value.is_unparsed());
    assert_eq!(bytes.to_vec(), encode(&format, &value));
}

#[test]
fn shortest_encodings_are_emitted() {
    // No redundant leading zero bytes from minimum-length
    // integers.
    let format = UIntFormat::variable();
    for (value, expected) in [(0u64, 1usize), (255, 1), (256, 2), (u64::MAX, 8)] {
        let bytes = encode(&format, &Value::of(value));
        assert_eq!(expected, bytes.len());
        if bytes.len() > 1 {
            assert_ne!(0, bytes[0]);
        }
    }

    // No leading 0x80 continuation byte from BER-OID.
    let format = BerOidFormat;
    for value in [0u64, 1, 127, 128, 16383, 16384, u64::MAX] {
        let bytes = encode(&format, &Value::of(value));
        assert_ne!(0x80, bytes[0]);
    }

    // BER long form uses the fewest value bytes.
    let format = BerFormat;
    assert_eq!(2, encode(&format, &Value::of(255u64)).len());
    assert_eq!(3, encode(&format, &Value::of(256u64)).len());
}

/// Asserts that `format`'s encoding is non-decreasing over a
/// sweep of inputs, including out-of-interval ones (which clamp).
fn codes_are_monotonic(format: &dyn Format, code_of: fn(&[u8]) -> i64) {
    let mut previous: Option<i64> = None;
    let mut sample = -12.0;
    while sample <= 12.0 {
        let bytes = encode(format, &Value::of(Real::new(sample, 2)));
        let code = code_of(&bytes);

        if let Some(previous) = previous {
            assert!(
                code >= previous,
                "{} not monotonic at {sample}",
                format.description()
            );
        }

        previous = Some(code);
        sample += 0.37;
    }
}

#[test]
fn mapped_encodings_are_monotonic() {
    let unsigned = |bytes: &[u8]| i64::from(u16::from_be_bytes([bytes[0], bytes[1]]));
    let signed = |bytes: &[u8]| i64::from(i16::from_be_bytes([bytes[0], bytes[1]]));

    codes_are_monotonic(&UflintFormat::new(-10.0, 10.0, 2), unsigned);
    codes_are_monotonic(&SflintFormat::new(-10.0, 10.0, 2), signed);
    codes_are_monotonic(&ImapFormat::new(-10.0, 10.0, 2), unsigned);
}

#[test]
fn unparsed_values_respect_write_limits() {
    let format = BlobFormat::variable();
    let value = decode(&StringFormat::variable(), &[0xFF, 0xFE, 0xFD]);
    assert!(value.is_unparsed());

    let mut buffer = [0u8; 8];
    let mut cursor = WriteCursor::new(&mut buffer);
    assert!(format.write(&value, &mut cursor, 2).is_err());
}

#[test]
fn read_hints_record_the_field_length() {
    let format = UIntFormat::variable();
    let value = decode(&format, &[0x01, 0x2C]);
    assert_eq!(2, value.length_hint());

    let format = ImapFormat::new(-900.0, 19000.0, 0);
    let value = decode(&format, &[0x00, 0x03, 0x84]);
    assert_eq!(3, value.length_hint());
    assert_eq!(3, value.as_real().expect("real").length);
}
