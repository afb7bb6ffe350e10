//! Segment Run Table (asrt) box
//!
//! Maps runs of segment numbers to a constant fragment count per
//! segment. Unlike afrt, every entry is a fixed 8 bytes.

use std::fmt;

use super::{BoxHeader, FourCC};
use crate::{error::Result, reader::BoxReader};

/// Wire size of one segment run entry: two u32 fields.
const SEGMENT_RUN_ENTRY_LEN: usize = 8;

/// A run of segments that all contain `fragments_per_segment`
/// fragments; terminated by the next entry's `first_segment`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentRunEntry {
    pub first_segment: u32,
    pub fragments_per_segment: u32,
}

/// Segment Run Table box, tag `asrt`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsrtBox {
    pub header: BoxHeader,
    pub version: u8,
    /// 24-bit field; bit 0 set means this table updates a previously
    /// sent full table.
    pub flags: u32,
    /// Empty means the table applies to all quality levels.
    pub quality_segment_url_modifiers: Vec<String>,
    pub segment_run_entries: Vec<SegmentRunEntry>,
}

impl AsrtBox {
    /// Decode one asrt box from the start of `data`, returning the box
    /// and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        let mut reader = BoxReader::new(data);
        let header = BoxHeader::read_expecting(&mut reader, FourCC::ASRT)?;

        let version = reader.read_u8()?;
        let flags = reader.read_u24()?;

        let quality_entry_count = reader.read_u8()?;
        let mut quality_segment_url_modifiers = Vec::with_capacity(quality_entry_count as usize);
        for _ in 0..quality_entry_count {
            quality_segment_url_modifiers.push(reader.read_cstring()?);
        }

        // The declared count is untrusted: cap the pre-allocation at what
        // the remaining bytes could possibly hold and let the per-entry
        // reads surface the truncation.
        let entry_count = reader.read_u32()?;
        let mut segment_run_entries = Vec::with_capacity(
            (entry_count as usize).min(reader.remaining() / SEGMENT_RUN_ENTRY_LEN),
        );
        for _ in 0..entry_count {
            segment_run_entries.push(SegmentRunEntry {
                first_segment: reader.read_u32()?,
                fragments_per_segment: reader.read_u32()?,
            });
        }

        Ok((
            Self {
                header,
                version,
                flags,
                quality_segment_url_modifiers,
                segment_run_entries,
            },
            reader.position(),
        ))
    }

    /// Whether this table updates a previously sent full table
    /// (flags bit 0).
    pub fn is_update(&self) -> bool {
        self.flags & 1 != 0
    }
}

impl fmt::Display for AsrtBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Flags: {}", self.flags)?;
        writeln!(
            f,
            "QualityEntryCount: {}",
            self.quality_segment_url_modifiers.len()
        )?;
        for (i, modifier) in self.quality_segment_url_modifiers.iter().enumerate() {
            writeln!(f, "QualitySegmentUrlModifiers[{}]: {}", i, modifier)?;
        }
        writeln!(f, "SegmentRunEntryCount: {}", self.segment_run_entries.len())?;
        for (i, entry) in self.segment_run_entries.iter().enumerate() {
            writeln!(
                f,
                "SegmentRunEntryTable[{}].FirstSegment: {}",
                i, entry.first_segment
            )?;
            writeln!(
                f,
                "SegmentRunEntryTable[{}].FragmentsPerSegment: {}",
                i, entry.fragments_per_segment
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::AsrtBuilder, Error};

    #[test]
    fn decodes_fixed_width_entries() {
        let buf = AsrtBuilder::new()
            .entry(1, 20)
            .entry(5, 16)
            .build();

        let (asrt, consumed) = AsrtBox::decode(&buf).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(asrt.header.box_type, FourCC::ASRT);
        assert_eq!(asrt.segment_run_entries.len(), 2);
        assert_eq!(
            asrt.segment_run_entries[0],
            SegmentRunEntry {
                first_segment: 1,
                fragments_per_segment: 20
            }
        );
        assert_eq!(
            asrt.segment_run_entries[1],
            SegmentRunEntry {
                first_segment: 5,
                fragments_per_segment: 16
            }
        );
    }

    #[test]
    fn empty_quality_list_is_legal() {
        let buf = AsrtBuilder::new().entry(1, 10).build();
        let (asrt, _) = AsrtBox::decode(&buf).unwrap();
        assert!(asrt.quality_segment_url_modifiers.is_empty());
    }

    #[test]
    fn absurd_declared_entry_count_is_truncated_input() {
        // A table with no entries ends in its 4-byte entry count;
        // rewrite it to claim u32::MAX entries on an empty tail.
        let mut buf = AsrtBuilder::new().build();
        let count_at = buf.len() - 4;
        buf[count_at..].copy_from_slice(&u32::MAX.to_be_bytes());

        assert!(matches!(
            AsrtBox::decode(&buf),
            Err(Error::TruncatedInput { .. })
        ));
    }

    #[test]
    fn every_truncation_point_is_rejected() {
        let buf = AsrtBuilder::new()
            .quality("disk")
            .entry(1, 20)
            .build();

        for len in 0..buf.len() {
            match AsrtBox::decode(&buf[..len]) {
                Err(Error::TruncatedInput { .. }) => {}
                other => panic!("prefix of {} bytes: expected TruncatedInput, got {:?}", len, other),
            }
        }
    }
}
