//! Positioned read and write handles over contiguous byte buffers.
//!
//! Every primitive codec in this crate consumes or produces bytes
//! through one of these cursors. A cursor borrows its buffer for the
//! duration of one call and advances monotonically; the format layer
//! cross-checks the advance deltas against each format's declared
//! length, so both cursors expose [`position`](ReadCursor::position).
use snafu::ensure;

use crate::codec::{CodecError, OverflowSnafu, TruncatedSnafu};

/// A read handle over a borrowed byte buffer.
///
/// Reads advance the cursor and fail with
/// [`CodecError::Truncated`] if fewer than the requested
/// bytes remain.
#[derive(Debug)]
pub struct ReadCursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ReadCursor<'a> {
    /// Returns a new cursor positioned at the start of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// The number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of bytes left in the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Reads the next byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_exact(1)?[0])
    }

    /// Borrows the next `length` bytes, advancing past them.
    pub fn read_exact(&mut self, length: usize) -> Result<&'a [u8], CodecError> {
        ensure!(
            length <= self.remaining(),
            TruncatedSnafu {
                needed: length,
                remaining: self.remaining(),
            }
        );

        let bytes = &self.buffer[self.position..self.position + length];
        self.position += length;
        Ok(bytes)
    }

    /// Rewinds the cursor to an earlier `position`.
    ///
    /// Only the format wrapper rewinds, and only to replay a
    /// failed parse as a blob.
    pub(crate) fn seek(&mut self, position: usize) {
        debug_assert!(position <= self.position);
        self.position = position;
    }
}

/// A write handle over a borrowed byte buffer.
///
/// Writes advance the cursor and fail with
/// [`CodecError::Overflow`] if fewer than the requested
/// bytes remain.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    buffer: &'a mut [u8],
    position: usize,
}

impl<'a> WriteCursor<'a> {
    /// Returns a new cursor positioned at the start of `buffer`.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// The number of bytes written so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of bytes left in the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, byte: u8) -> Result<(), CodecError> {
        self.write_all(&[byte])
    }

    /// Writes all of `bytes`.
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        ensure!(
            bytes.len() <= self.remaining(),
            OverflowSnafu {
                needed: bytes.len(),
                remaining: self.remaining(),
            }
        );

        self.buffer[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        Ok(())
    }

    /// Borrows the bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.position]
    }
}
