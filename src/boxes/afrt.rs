//! Fragment Run Table (afrt) box
//!
//! Maps runs of fragment numbers to timestamps and durations. Entries
//! are variable-width: a zero duration marks a discontinuity and is
//! followed by one extra indicator byte.

use std::fmt;

use super::{BoxHeader, FourCC};
use crate::{error::Result, reader::BoxReader};

/// Smallest wire size of one fragment run entry: u32 + u64 + u32, the
/// conditional discontinuity byte excluded.
const FRAGMENT_RUN_ENTRY_MIN_LEN: usize = 16;

/// One run of fragments sharing a duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentRunEntry {
    pub first_fragment: u32,
    /// In units of the enclosing table's time scale.
    pub first_fragment_timestamp: u64,
    pub fragment_duration: u32,
    /// Present on the wire only when `fragment_duration == 0`.
    pub discontinuity_indicator: Option<u8>,
}

/// Fragment Run Table box, tag `afrt`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AfrtBox {
    pub header: BoxHeader,
    pub version: u8,
    /// 24-bit field; bit 0 set means this table updates a previously
    /// sent full table.
    pub flags: u32,
    /// Time units per second for timestamps and durations.
    pub time_scale: u32,
    /// Empty means the table applies to all quality levels.
    pub quality_segment_url_modifiers: Vec<String>,
    pub fragment_run_entries: Vec<FragmentRunEntry>,
}

impl AfrtBox {
    /// Decode one afrt box from the start of `data`, returning the box
    /// and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        let mut reader = BoxReader::new(data);
        let header = BoxHeader::read_expecting(&mut reader, FourCC::AFRT)?;

        let version = reader.read_u8()?;
        let flags = reader.read_u24()?;
        let time_scale = reader.read_u32()?;

        let quality_entry_count = reader.read_u8()?;
        let mut quality_segment_url_modifiers = Vec::with_capacity(quality_entry_count as usize);
        for _ in 0..quality_entry_count {
            quality_segment_url_modifiers.push(reader.read_cstring()?);
        }

        // The declared count is untrusted: cap the pre-allocation at what
        // the remaining bytes could possibly hold and let the per-entry
        // reads surface the truncation.
        let entry_count = reader.read_u32()?;
        let mut fragment_run_entries = Vec::with_capacity(
            (entry_count as usize).min(reader.remaining() / FRAGMENT_RUN_ENTRY_MIN_LEN),
        );
        for _ in 0..entry_count {
            let first_fragment = reader.read_u32()?;
            let first_fragment_timestamp = reader.read_u64()?;
            let fragment_duration = reader.read_u32()?;
            // Variable-width record: a zero duration carries one extra byte.
            let discontinuity_indicator = if fragment_duration == 0 {
                Some(reader.read_u8()?)
            } else {
                None
            };
            fragment_run_entries.push(FragmentRunEntry {
                first_fragment,
                first_fragment_timestamp,
                fragment_duration,
                discontinuity_indicator,
            });
        }

        Ok((
            Self {
                header,
                version,
                flags,
                time_scale,
                quality_segment_url_modifiers,
                fragment_run_entries,
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

impl fmt::Display for AfrtBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Flags: {}", self.flags)?;
        writeln!(f, "TimeScale: {}", self.time_scale)?;
        writeln!(
            f,
            "QualityEntryCount: {}",
            self.quality_segment_url_modifiers.len()
        )?;
        for (i, modifier) in self.quality_segment_url_modifiers.iter().enumerate() {
            writeln!(f, "QualitySegmentUrlModifiers[{}]: {}", i, modifier)?;
        }
        writeln!(
            f,
            "FragmentRunEntryCount: {}",
            self.fragment_run_entries.len()
        )?;
        for (i, entry) in self.fragment_run_entries.iter().enumerate() {
            writeln!(
                f,
                "FragmentRunEntryTable[{}].FirstFragment: {}",
                i, entry.first_fragment
            )?;
            writeln!(
                f,
                "FragmentRunEntryTable[{}].FirstFragmentTimestamp: {}",
                i, entry.first_fragment_timestamp
            )?;
            writeln!(
                f,
                "FragmentRunEntryTable[{}].FragmentDuration: {}",
                i, entry.fragment_duration
            )?;
            if let Some(indicator) = entry.discontinuity_indicator {
                writeln!(
                    f,
                    "FragmentRunEntryTable[{}].DiscontinuityIndicator: {}",
                    i, indicator
                )?;
            }
        }
        Ok(())
    }
}
