//! Bootstrap Info (abst) box
//!
//! Top-level HDS bootstrap metadata: presentation identity and timing,
//! server and quality URL tables, and the nested segment (asrt) and
//! fragment (afrt) run tables.

use std::fmt;

use super::{AfrtBox, AsrtBox, BoxHeader, FourCC};
use crate::{
    error::{Error, Result},
    reader::BoxReader,
};

/// Access profile, from the top two bits of the packed flags byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// Named Access (0)
    NamedAccess,
    /// Range Access (1)
    RangeAccess,
    /// Reserved for future profiles (2 or 3)
    Reserved(u8),
}

impl Profile {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Profile::NamedAccess,
            1 => Profile::RangeAccess,
            other => Profile::Reserved(other),
        }
    }

    /// The raw 2-bit field value.
    pub fn value(&self) -> u8 {
        match self {
            Profile::NamedAccess => 0,
            Profile::RangeAccess => 1,
            Profile::Reserved(v) => *v,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::NamedAccess => write!(f, "Named Access"),
            Profile::RangeAccess => write!(f, "Range Access"),
            Profile::Reserved(v) => write!(f, "Reserved ({})", v),
        }
    }
}

/// Bootstrap Info box, tag `abst`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbstBox {
    pub header: BoxHeader,
    pub version: u8,
    /// 24-bit field, reserved. Set to 0.
    pub flags: u32,
    /// When `update` is set, the version number being updated.
    pub bootstrap_info_version: u32,
    pub profile: Profile,
    /// Whether the media presentation is live.
    pub live: bool,
    /// Whether this box is an update to a previously sent full version.
    pub update: bool,
    /// Low 4 bits of the packed byte, reserved. Set to 0.
    pub reserved: u8,
    /// Time units per second for `current_media_time`. Typically 1000.
    pub time_scale: u32,
    /// Timestamp of the latest available fragment, in time-scale units.
    pub current_media_time: u64,
    /// Offset from the SMPTE time code in milliseconds, or 0.
    pub smpte_time_code_offset: u64,
    pub movie_identifier: String,
    /// Server base URLs in descending order of preference.
    pub server_base_urls: Vec<String>,
    /// Quality references in order from high to low quality.
    pub quality_segment_url_modifiers: Vec<String>,
    /// DRM metadata, empty when the presentation is not encrypted.
    pub drm_data: String,
    pub metadata: String,
    pub segment_run_tables: Vec<AsrtBox>,
    pub fragment_run_tables: Vec<AfrtBox>,
}

impl AbstBox {
    /// Decode one abst box from the start of `data`, returning the box
    /// and the number of bytes consumed.
    ///
    /// Nested asrt/afrt boxes are decoded in place; a nested failure
    /// aborts the whole decode with [`Error::NestedBoxDecodeFailed`],
    /// and a child whose declared size disagrees with its encoded
    /// length is [`Error::BoxSizeMismatch`].
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        let mut reader = BoxReader::new(data);
        let header = BoxHeader::read_expecting(&mut reader, FourCC::ABST)?;

        let version = reader.read_u8()?;
        let flags = reader.read_u24()?;
        let bootstrap_info_version = reader.read_u32()?;

        // One packed byte: profile (bits 7-6), live (bit 5),
        // update (bit 4), reserved (bits 3-0).
        let packed = reader.read_u8()?;
        let profile = Profile::from_bits((packed >> 6) & 0x03);
        let live = (packed >> 5) & 0x01 != 0;
        let update = (packed >> 4) & 0x01 != 0;
        let reserved = packed & 0x0f;

        let time_scale = reader.read_u32()?;
        let current_media_time = reader.read_u64()?;
        let smpte_time_code_offset = reader.read_u64()?;

        let movie_identifier = reader.read_cstring()?;

        let server_entry_count = reader.read_u8()?;
        let mut server_base_urls = Vec::with_capacity(server_entry_count as usize);
        for _ in 0..server_entry_count {
            server_base_urls.push(reader.read_cstring()?);
        }

        let quality_entry_count = reader.read_u8()?;
        let mut quality_segment_url_modifiers = Vec::with_capacity(quality_entry_count as usize);
        for _ in 0..quality_entry_count {
            quality_segment_url_modifiers.push(reader.read_cstring()?);
        }

        let drm_data = reader.read_cstring()?;
        let metadata = reader.read_cstring()?;

        let segment_run_table_count = reader.read_u8()?;
        let mut segment_run_tables = Vec::with_capacity(segment_run_table_count as usize);
        for index in 0..segment_run_table_count as usize {
            let (asrt, consumed) = AsrtBox::decode(reader.remainder())
                .map_err(|err| nested_failure(index, FourCC::ASRT, err))?;
            advance_past_child(&mut reader, &asrt.header, consumed)?;
            segment_run_tables.push(asrt);
        }

        let fragment_run_table_count = reader.read_u8()?;
        let mut fragment_run_tables = Vec::with_capacity(fragment_run_table_count as usize);
        for index in 0..fragment_run_table_count as usize {
            let (afrt, consumed) = AfrtBox::decode(reader.remainder())
                .map_err(|err| nested_failure(index, FourCC::AFRT, err))?;
            advance_past_child(&mut reader, &afrt.header, consumed)?;
            fragment_run_tables.push(afrt);
        }

        Ok((
            Self {
                header,
                version,
                flags,
                bootstrap_info_version,
                profile,
                live,
                update,
                reserved,
                time_scale,
                current_media_time,
                smpte_time_code_offset,
                movie_identifier,
                server_base_urls,
                quality_segment_url_modifiers,
                drm_data,
                metadata,
                segment_run_tables,
                fragment_run_tables,
            },
            reader.position(),
        ))
    }
}

fn nested_failure(index: usize, expected: FourCC, source: Error) -> Error {
    Error::NestedBoxDecodeFailed {
        index,
        expected,
        source: Box::new(source),
    }
}

/// Step over a decoded child box. The wire contract says siblings are
/// located via the child's declared `size()`, so a child that consumed
/// a different number of bytes would silently desynchronize every field
/// after it; reject that instead.
fn advance_past_child(
    reader: &mut BoxReader,
    child: &BoxHeader,
    consumed: usize,
) -> Result<()> {
    if child.size() != consumed as u64 {
        return Err(Error::BoxSizeMismatch {
            box_type: child.box_type,
            declared: child.size(),
            consumed: consumed as u64,
        });
    }
    reader.skip(consumed)
}

impl fmt::Display for AbstBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Flags: {}", self.flags)?;
        writeln!(f, "BootstrapInfoVersion: {}", self.bootstrap_info_version)?;
        writeln!(f, "Profile: {}", self.profile)?;
        writeln!(f, "Live: {}", self.live)?;
        writeln!(f, "Update: {}", self.update)?;
        writeln!(f, "Reserved: {}", self.reserved)?;
        writeln!(f, "TimeScale: {}", self.time_scale)?;
        writeln!(f, "CurrentMediaTime: {}", self.current_media_time)?;
        writeln!(f, "SmpteTimeCodeOffset: {}", self.smpte_time_code_offset)?;
        writeln!(f, "MovieIdentifier: {}", self.movie_identifier)?;
        writeln!(f, "ServerEntryCount: {}", self.server_base_urls.len())?;
        for (i, url) in self.server_base_urls.iter().enumerate() {
            writeln!(f, "ServerEntryTable[{}].ServerBaseUrl: {}", i, url)?;
        }
        writeln!(
            f,
            "QualityEntryCount: {}",
            self.quality_segment_url_modifiers.len()
        )?;
        for (i, modifier) in self.quality_segment_url_modifiers.iter().enumerate() {
            writeln!(
                f,
                "QualityEntryTable[{}].QualitySegmentUrlModifier: {}",
                i, modifier
            )?;
        }
        writeln!(f, "DrmData: {}", self.drm_data)?;
        writeln!(f, "MetaData: {}", self.metadata)?;
        writeln!(f, "SegmentRunTableCount: {}", self.segment_run_tables.len())?;
        for (i, asrt) in self.segment_run_tables.iter().enumerate() {
            writeln!(f, "SegmentRunTableEntries[{}]:", i)?;
            writeln!(f, "---ASRT---")?;
            write!(f, "{}", asrt)?;
        }
        writeln!(
            f,
            "FragmentRunTableCount: {}",
            self.fragment_run_tables.len()
        )?;
        for (i, afrt) in self.fragment_run_tables.iter().enumerate() {
            writeln!(f, "FragmentRunTableEntries[{}]:", i)?;
            writeln!(f, "---AFRT---")?;
            write!(f, "{}", afrt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{AbstBuilder, AfrtBuilder, AsrtBuilder},
        Error,
    };

    #[test]
    fn unpacks_profile_live_update_byte() {
        // profile=1, live=1, update=0, reserved=0 -> 0b0110_0000
        let buf = AbstBuilder::new()
            .packed_byte(0b0110_0000)
            .movie_identifier("stream")
            .build();

        let (abst, _) = AbstBox::decode(&buf).unwrap();
        assert_eq!(abst.profile, Profile::RangeAccess);
        assert!(abst.live);
        assert!(!abst.update);
        assert_eq!(abst.reserved, 0);
    }

    #[test]
    fn reserved_bits_are_preserved() {
        let buf = AbstBuilder::new().packed_byte(0b1001_0101).build();
        let (abst, _) = AbstBox::decode(&buf).unwrap();
        assert_eq!(abst.profile, Profile::Reserved(2));
        assert!(!abst.live);
        assert!(abst.update);
        assert_eq!(abst.reserved, 0b0101);
    }

    #[test]
    fn empty_identifier_and_server_list_consume_no_extra_bytes() {
        let buf = AbstBuilder::new().build();

        let (abst, consumed) = AbstBox::decode(&buf).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(abst.movie_identifier, "");
        assert!(abst.server_base_urls.is_empty());
        assert_eq!(abst.drm_data, "");
        assert_eq!(abst.metadata, "");
    }

    #[test]
    fn nested_failure_reports_index_and_type() {
        // Second asrt child truncated to its first 6 bytes.
        let good = AsrtBuilder::new().entry(1, 20).build();
        let bad = good[..6].to_vec();
        let buf = AbstBuilder::new()
            .raw_segment_run_table(good)
            .raw_segment_run_table(bad)
            .build();

        match AbstBox::decode(&buf) {
            Err(Error::NestedBoxDecodeFailed {
                index,
                expected,
                source,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(expected, FourCC::ASRT);
                assert!(matches!(*source, Error::TruncatedInput { .. }));
            }
            other => panic!("expected NestedBoxDecodeFailed, got {:?}", other),
        }
    }

    #[test]
    fn child_size_mismatch_is_rejected() {
        // Child claims 4 bytes more than it encodes.
        let mut child = AsrtBuilder::new().entry(1, 20).build();
        let lie = (child.len() + 4) as u32;
        child[..4].copy_from_slice(&lie.to_be_bytes());
        let buf = AbstBuilder::new().raw_segment_run_table(child).build();

        match AbstBox::decode(&buf) {
            Err(Error::BoxSizeMismatch {
                box_type,
                declared,
                consumed,
            }) => {
                assert_eq!(box_type, FourCC::ASRT);
                assert_eq!(declared, consumed + 4);
            }
            other => panic!("expected BoxSizeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn dump_lists_fields_in_declaration_order() {
        let buf = AbstBuilder::new()
            .movie_identifier("movie.f4m")
            .server("http://cdn.example.com")
            .segment_run_table(AsrtBuilder::new().entry(1, 20))
            .fragment_run_table(AfrtBuilder::new().time_scale(1000).entry(1, 0, 4000, None))
            .build();

        let (abst, _) = AbstBox::decode(&buf).unwrap();
        let dump = abst.to_string();
        let version = dump.find("Version: 0").unwrap();
        let movie = dump.find("MovieIdentifier: movie.f4m").unwrap();
        let asrt = dump.find("---ASRT---").unwrap();
        let afrt = dump.find("---AFRT---").unwrap();
        assert!(version < movie && movie < asrt && asrt < afrt);
        assert!(dump.contains("ServerEntryTable[0].ServerBaseUrl: http://cdn.example.com"));
    }
}
