//! Byte-level helpers shared by the built-in serializers.
//!
//! Every fully-qualified value is laid out as:
//! ```text
//! ┌────────────┬──────────────────────────┬────────────┬──────────────────┐
//! │ Type (1B)  │ Custom name              │ Flag (1B)  │ Payload          │
//! │            │ (CUSTOM only, i32 + UTF8)│ 0x00 | 0x01│ (absent on null) │
//! └────────────┴──────────────────────────┴────────────┴──────────────────┘
//! ```
//! All multi-byte integers are big-endian. Reads never panic on short input:
//! they fail with [`SerializationError::Truncated`].

use std::cell::Cell;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, SerializationError};

/// Value flag: payload follows.
pub const VALUE_FLAG_PRESENT: u8 = 0x00;

/// Value flag written for null. Any nonzero flag reads as null.
pub const VALUE_FLAG_NULL: u8 = 0x01;

/// Fully-qualified untyped null: UNSPECIFIED_NULL code + null flag.
pub const UNSPECIFIED_NULL_BYTES: [u8; 2] = [0xFE, VALUE_FLAG_NULL];

/// Fail unless `buf` holds at least `needed` bytes.
pub fn ensure_remaining(buf: &Bytes, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(SerializationError::Truncated {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

pub fn get_u8(buf: &mut Bytes) -> Result<u8> {
    ensure_remaining(buf, 1)?;
    Ok(buf.get_u8())
}

pub fn get_i8(buf: &mut Bytes) -> Result<i8> {
    ensure_remaining(buf, 1)?;
    Ok(buf.get_i8())
}

pub fn get_i16(buf: &mut Bytes) -> Result<i16> {
    ensure_remaining(buf, 2)?;
    Ok(buf.get_i16())
}

pub fn get_i32(buf: &mut Bytes) -> Result<i32> {
    ensure_remaining(buf, 4)?;
    Ok(buf.get_i32())
}

pub fn get_i64(buf: &mut Bytes) -> Result<i64> {
    ensure_remaining(buf, 8)?;
    Ok(buf.get_i64())
}

pub fn get_f32(buf: &mut Bytes) -> Result<f32> {
    ensure_remaining(buf, 4)?;
    Ok(buf.get_f32())
}

pub fn get_f64(buf: &mut Bytes) -> Result<f64> {
    ensure_remaining(buf, 8)?;
    Ok(buf.get_f64())
}

/// Split off exactly `len` bytes.
pub fn get_bytes(buf: &mut Bytes, len: usize) -> Result<Bytes> {
    ensure_remaining(buf, len)?;
    Ok(buf.split_to(len))
}

/// Read an i32 length or count prefix, rejecting negatives and values above `max`.
pub fn get_length(buf: &mut Bytes, max: usize) -> Result<usize> {
    let raw = get_i32(buf)?;
    let len = usize::try_from(raw).map_err(|_| SerializationError::NegativeLength(raw))?;
    if len > max {
        return Err(SerializationError::LengthTooLarge { len, max });
    }
    Ok(len)
}

/// Write an i32 length or count prefix.
pub fn put_length(dst: &mut BytesMut, len: usize) -> Result<()> {
    let prefix = i32::try_from(len).map_err(|_| SerializationError::LengthTooLarge {
        len,
        max: i32::MAX as usize,
    })?;
    dst.put_i32(prefix);
    Ok(())
}

/// Write a STRING payload: i32 byte length followed by UTF-8.
pub fn put_string(dst: &mut BytesMut, value: &str) -> Result<()> {
    put_length(dst, value.len())?;
    dst.put_slice(value.as_bytes());
    Ok(())
}

/// Read a STRING payload whose byte length is at most `max`.
pub fn get_string(buf: &mut Bytes, max: usize) -> Result<String> {
    let len = get_length(buf, max)?;
    let raw = get_bytes(buf, len)?;
    Ok(String::from_utf8(raw.to_vec())?)
}

/// Read the value flag, returning true when the value is null.
pub fn get_null_flag(buf: &mut Bytes) -> Result<bool> {
    Ok(get_u8(buf)? != VALUE_FLAG_PRESENT)
}

/// Nesting counter for one codec context.
#[derive(Debug, Default)]
pub(crate) struct DepthCounter(Cell<usize>);

impl DepthCounter {
    /// Enter one level of nesting; the level is left when the guard drops.
    pub(crate) fn enter(&self, max: usize) -> Result<DepthGuard<'_>> {
        let depth = self.0.get() + 1;
        if depth > max {
            return Err(SerializationError::DepthExceeded { max });
        }
        self.0.set(depth);
        Ok(DepthGuard(&self.0))
    }
}

pub(crate) struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}
