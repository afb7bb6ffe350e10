//! Test utilities: wire-format builders for bootstrap boxes.
//!
//! These builders emit the big-endian encoding the decoders consume,
//! so tests can assemble well-formed (or deliberately damaged) buffers
//! without binary fixtures.
//!
//! # Usage
//!
//! ```
//! use hds_bootstrap::test_utils::{AbstBuilder, AsrtBuilder};
//! use hds_bootstrap::decode_abst;
//!
//! let buf = AbstBuilder::new()
//!     .movie_identifier("movie.f4m")
//!     .segment_run_table(AsrtBuilder::new().entry(1, 20))
//!     .build();
//! let abst = decode_abst(&buf).unwrap();
//! assert_eq!(abst.movie_identifier, "movie.f4m");
//! ```

use byteorder::{BigEndian, WriteBytesExt};

/// Prepend a box header to `body`. Compact 8-byte form by default; the
/// extended form writes the sentinel `1` plus a 64-bit size.
fn wrap_box(tag: &[u8; 4], body: Vec<u8>, extended: bool) -> Vec<u8> {
    let mut buf = Vec::with_capacity(body.len() + 16);
    if extended {
        buf.write_u32::<BigEndian>(1).expect("vec write");
        buf.extend_from_slice(tag);
        buf.write_u64::<BigEndian>((body.len() + 16) as u64)
            .expect("vec write");
    } else {
        buf.write_u32::<BigEndian>((body.len() + 8) as u32)
            .expect("vec write");
        buf.extend_from_slice(tag);
    }
    buf.extend_from_slice(&body);
    buf
}

fn push_cstring(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

/// Builder for Fragment Run Table (afrt) box buffers
#[derive(Default)]
pub struct AfrtBuilder {
    version: u8,
    flags: u32,
    time_scale: u32,
    qualities: Vec<String>,
    entries: Vec<(u32, u64, u32, Option<u8>)>,
    extended: bool,
}

impl AfrtBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn time_scale(mut self, time_scale: u32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn quality(mut self, modifier: &str) -> Self {
        self.qualities.push(modifier.to_string());
        self
    }

    /// Add one fragment run entry. The discontinuity indicator is only
    /// encoded when `duration == 0`, matching the wire format.
    pub fn entry(
        mut self,
        first_fragment: u32,
        timestamp: u64,
        duration: u32,
        discontinuity: Option<u8>,
    ) -> Self {
        self.entries
            .push((first_fragment, timestamp, duration, discontinuity));
        self
    }

    /// Emit the 16-byte extended-size header form.
    pub fn extended_header(mut self) -> Self {
        self.extended = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        body.push(self.version);
        body.write_u24::<BigEndian>(self.flags).expect("vec write");
        body.write_u32::<BigEndian>(self.time_scale)
            .expect("vec write");
        body.push(self.qualities.len() as u8);
        for q in &self.qualities {
            push_cstring(&mut body, q);
        }
        body.write_u32::<BigEndian>(self.entries.len() as u32)
            .expect("vec write");
        for &(first, ts, duration, disc) in &self.entries {
            body.write_u32::<BigEndian>(first).expect("vec write");
            body.write_u64::<BigEndian>(ts).expect("vec write");
            body.write_u32::<BigEndian>(duration).expect("vec write");
            if duration == 0 {
                body.push(disc.unwrap_or(0));
            }
        }
        wrap_box(b"afrt", body, self.extended)
    }
}

/// Builder for Segment Run Table (asrt) box buffers
#[derive(Default)]
pub struct AsrtBuilder {
    version: u8,
    flags: u32,
    qualities: Vec<String>,
    entries: Vec<(u32, u32)>,
    extended: bool,
}

impl AsrtBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn quality(mut self, modifier: &str) -> Self {
        self.qualities.push(modifier.to_string());
        self
    }

    pub fn entry(mut self, first_segment: u32, fragments_per_segment: u32) -> Self {
        self.entries.push((first_segment, fragments_per_segment));
        self
    }

    /// Emit the 16-byte extended-size header form.
    pub fn extended_header(mut self) -> Self {
        self.extended = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        body.push(self.version);
        body.write_u24::<BigEndian>(self.flags).expect("vec write");
        body.push(self.qualities.len() as u8);
        for q in &self.qualities {
            push_cstring(&mut body, q);
        }
        body.write_u32::<BigEndian>(self.entries.len() as u32)
            .expect("vec write");
        for &(first, per) in &self.entries {
            body.write_u32::<BigEndian>(first).expect("vec write");
            body.write_u32::<BigEndian>(per).expect("vec write");
        }
        wrap_box(b"asrt", body, self.extended)
    }
}

/// Builder for Bootstrap Info (abst) box buffers
pub struct AbstBuilder {
    version: u8,
    flags: u32,
    bootstrap_info_version: u32,
    packed: u8,
    time_scale: u32,
    current_media_time: u64,
    smpte_time_code_offset: u64,
    movie_identifier: String,
    servers: Vec<String>,
    qualities: Vec<String>,
    drm_data: String,
    metadata: String,
    segment_run_tables: Vec<Vec<u8>>,
    fragment_run_tables: Vec<Vec<u8>>,
}

impl Default for AbstBuilder {
    fn default() -> Self {
        Self {
            version: 0,
            flags: 0,
            bootstrap_info_version: 1,
            packed: 0,
            time_scale: 1000,
            current_media_time: 0,
            smpte_time_code_offset: 0,
            movie_identifier: String::new(),
            servers: Vec::new(),
            qualities: Vec::new(),
            drm_data: String::new(),
            metadata: String::new(),
            segment_run_tables: Vec::new(),
            fragment_run_tables: Vec::new(),
        }
    }
}

impl AbstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn bootstrap_info_version(mut self, v: u32) -> Self {
        self.bootstrap_info_version = v;
        self
    }

    /// Raw profile/live/update/reserved byte, MSB first.
    pub fn packed_byte(mut self, packed: u8) -> Self {
        self.packed = packed;
        self
    }

    pub fn time_scale(mut self, time_scale: u32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn current_media_time(mut self, t: u64) -> Self {
        self.current_media_time = t;
        self
    }

    pub fn smpte_time_code_offset(mut self, t: u64) -> Self {
        self.smpte_time_code_offset = t;
        self
    }

    pub fn movie_identifier(mut self, id: &str) -> Self {
        self.movie_identifier = id.to_string();
        self
    }

    pub fn server(mut self, base_url: &str) -> Self {
        self.servers.push(base_url.to_string());
        self
    }

    pub fn quality(mut self, modifier: &str) -> Self {
        self.qualities.push(modifier.to_string());
        self
    }

    pub fn drm_data(mut self, data: &str) -> Self {
        self.drm_data = data.to_string();
        self
    }

    pub fn metadata(mut self, data: &str) -> Self {
        self.metadata = data.to_string();
        self
    }

    pub fn segment_run_table(mut self, asrt: AsrtBuilder) -> Self {
        self.segment_run_tables.push(asrt.build());
        self
    }

    pub fn fragment_run_table(mut self, afrt: AfrtBuilder) -> Self {
        self.fragment_run_tables.push(afrt.build());
        self
    }

    /// Embed already-encoded (possibly malformed) asrt bytes.
    pub fn raw_segment_run_table(mut self, bytes: Vec<u8>) -> Self {
        self.segment_run_tables.push(bytes);
        self
    }

    /// Embed already-encoded (possibly malformed) afrt bytes.
    pub fn raw_fragment_run_table(mut self, bytes: Vec<u8>) -> Self {
        self.fragment_run_tables.push(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        body.push(self.version);
        body.write_u24::<BigEndian>(self.flags).expect("vec write");
        body.write_u32::<BigEndian>(self.bootstrap_info_version)
            .expect("vec write");
        body.push(self.packed);
        body.write_u32::<BigEndian>(self.time_scale)
            .expect("vec write");
        body.write_u64::<BigEndian>(self.current_media_time)
            .expect("vec write");
        body.write_u64::<BigEndian>(self.smpte_time_code_offset)
            .expect("vec write");
        push_cstring(&mut body, &self.movie_identifier);
        body.push(self.servers.len() as u8);
        for s in &self.servers {
            push_cstring(&mut body, s);
        }
        body.push(self.qualities.len() as u8);
        for q in &self.qualities {
            push_cstring(&mut body, q);
        }
        push_cstring(&mut body, &self.drm_data);
        push_cstring(&mut body, &self.metadata);
        body.push(self.segment_run_tables.len() as u8);
        for table in &self.segment_run_tables {
            body.extend_from_slice(table);
        }
        body.push(self.fragment_run_tables.len() as u8);
        for table in &self.fragment_run_tables {
            body.extend_from_slice(table);
        }
        wrap_box(b"abst", body, false)
    }
}
