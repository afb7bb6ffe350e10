//! Bounds-checked cursor over an in-memory box buffer
//!
//! Every decoder reads through [`BoxReader`], which validates the
//! remaining length before each read and reports a structured
//! [`Error::TruncatedInput`] instead of panicking or zero-padding.

use byteorder::{BigEndian, ByteOrder};

use crate::{
    boxes::FourCC,
    error::{Error, Result},
};

/// Read cursor over a byte buffer, big-endian throughout.
///
/// The buffer is borrowed read-only for the duration of a decode;
/// everything read out of it is copied into owned values.
pub(crate) struct BoxReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BoxReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer, equal to the total
    /// number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Slice of everything not yet consumed.
    pub fn remainder(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Advance the cursor by `n` already-accounted-for bytes, such as a
    /// nested box decoded out of `remainder()`.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.require(n)?;
        self.pos += n;
        Ok(())
    }

    fn require(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(Error::TruncatedInput {
                offset: self.pos,
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        let v = self.buf[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// 24-bit big-endian integer, as used by box version/flags fields.
    pub fn read_u24(&mut self) -> Result<u32> {
        self.require(3)?;
        let v = BigEndian::read_u24(&self.buf[self.pos..]);
        self.pos += 3;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.require(4)?;
        let v = BigEndian::read_u32(&self.buf[self.pos..]);
        self.pos += 4;
        Ok(v)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.require(8)?;
        let v = BigEndian::read_u64(&self.buf[self.pos..]);
        self.pos += 8;
        Ok(v)
    }

    pub fn read_fourcc(&mut self) -> Result<FourCC> {
        self.require(4)?;
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(FourCC(tag))
    }

    /// Null-terminated UTF-8 string. The terminator is consumed but not
    /// included in the value; an immediate terminator yields "".
    ///
    /// The terminator is located first and the string materialized in a
    /// single copy. Running off the end of the buffer before finding a
    /// terminator is `TruncatedInput`.
    pub fn read_cstring(&mut self) -> Result<String> {
        let rest = &self.buf[self.pos..];
        let nul = rest.iter().position(|&b| b == 0).ok_or({
            Error::TruncatedInput {
                offset: self.pos,
                needed: rest.len() + 1,
                remaining: rest.len(),
            }
        })?;
        let s = String::from_utf8_lossy(&rest[..nul]).into_owned();
        self.pos += nul + 1;
        Ok(s)
    }
}
