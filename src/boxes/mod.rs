//! F4V box types: the universal header plus the three HDS bootstrap
//! boxes (abst, asrt, afrt)
//!
//! Reference: Adobe Flash Video File Format Specification v10.1,
//! Annex C (HTTP Dynamic Streaming bootstrap information).

mod abst;
mod afrt;
mod asrt;

pub use abst::{AbstBox, Profile};
pub use afrt::{AfrtBox, FragmentRunEntry};
pub use asrt::{AsrtBox, SegmentRunEntry};

use std::fmt;

use crate::{
    error::{Error, Result},
    reader::BoxReader,
};

/// Four-character box type tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Bootstrap Info box
    pub const ABST: FourCC = FourCC(*b"abst");
    /// Segment Run Table box
    pub const ASRT: FourCC = FourCC(*b"asrt");
    /// Fragment Run Table box
    pub const AFRT: FourCC = FourCC(*b"afrt");
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Universal box prefix: 32-bit size, 4-byte tag, and an optional
/// 64-bit extended size when the 32-bit field holds the sentinel `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxHeader {
    pub total_size: u32,
    pub box_type: FourCC,
    pub extended_size: Option<u64>,
}

impl BoxHeader {
    /// Read a header at the cursor, consuming 8 or 16 bytes.
    pub(crate) fn read(reader: &mut BoxReader) -> Result<Self> {
        let total_size = reader.read_u32()?;
        let box_type = reader.read_fourcc()?;
        let extended_size = if total_size == 1 {
            Some(reader.read_u64()?)
        } else {
            None
        };
        Ok(Self {
            total_size,
            box_type,
            extended_size,
        })
    }

    /// Read a header and require a specific box tag.
    pub(crate) fn read_expecting(reader: &mut BoxReader, expected: FourCC) -> Result<Self> {
        let header = Self::read(reader)?;
        if header.box_type != expected {
            return Err(Error::UnexpectedBoxType {
                expected,
                found: header.box_type,
            });
        }
        Ok(header)
    }

    /// Total encoded length of the box in bytes, header included,
    /// resolving the extended-size sentinel. Callers use this to locate
    /// the next sibling box.
    pub fn size(&self) -> u64 {
        match self.extended_size {
            Some(ext) => ext,
            None => self.total_size as u64,
        }
    }

    /// Bytes the header itself occupies on the wire: 8, or 16 with an
    /// extended size.
    pub fn header_len(&self) -> usize {
        if self.extended_size.is_some() {
            16
        } else {
            8
        }
    }
}

impl fmt::Display for BoxHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TotalSize: {}", self.total_size)?;
        writeln!(f, "BoxType: {}", self.box_type)?;
        if let Some(ext) = self.extended_size {
            writeln!(f, "ExtendedSize: {}", ext)?;
        }
        Ok(())
    }
}
