//! Decoder for Adobe HDS/F4V Bootstrap Info (`abst`) boxes.
//!
//! HTTP Dynamic Streaming clients locate media segments and fragments
//! through a Bootstrap Info box, which carries presentation timing,
//! server base URLs, quality variants, and two kinds of nested run
//! tables: Segment Run Tables (`asrt`) and Fragment Run Tables
//! (`afrt`). This crate decodes all three box kinds from an in-memory
//! buffer into owned value types, validating every read against the
//! buffer length, and can render the result as a line-per-field text
//! dump via [`std::fmt::Display`].
//!
//! # Design Principles
//!
//! - **Defensive**: every fixed-size read and string scan is
//!   bounds-checked; malformed input yields a structured [`Error`],
//!   never a panic or a silent zero-fill
//! - **Owned output**: decoded boxes copy their strings and tables, so
//!   the input buffer can be dropped or reused immediately
//! - **Read-only**: this crate never writes F4V boxes
//!
//! # Quick Start
//!
//! ```no_run
//! use hds_bootstrap::decode_abst;
//!
//! # fn main() -> hds_bootstrap::Result<()> {
//! let data = std::fs::read("bootstrap.bin")?;
//! let abst = decode_abst(&data)?;
//!
//! println!("movie: {}", abst.movie_identifier);
//! println!("live: {}", abst.live);
//! for asrt in &abst.segment_run_tables {
//!     println!("segment runs: {}", asrt.segment_run_entries.len());
//! }
//! print!("{}", abst); // full field dump
//! # Ok(())
//! # }
//! ```
//!
//! Lower-level entry points return the number of bytes consumed along
//! with the box, for callers walking a larger buffer:
//!
//! ```no_run
//! use hds_bootstrap::AfrtBox;
//!
//! # fn main() -> hds_bootstrap::Result<()> {
//! # let data: Vec<u8> = Vec::new();
//! let (afrt, consumed) = AfrtBox::decode(&data)?;
//! assert_eq!(consumed as u64, afrt.header.size());
//! # Ok(())
//! # }
//! ```

mod boxes;
mod error;
mod reader;

pub use boxes::{
    AbstBox, AfrtBox, AsrtBox, BoxHeader, FourCC, FragmentRunEntry, Profile, SegmentRunEntry,
};
pub use error::{Error, Result};

// Test utilities - only compiled for tests or when explicitly enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Decode a Bootstrap Info box from the start of `data`.
///
/// Convenience wrapper over [`AbstBox::decode`] for callers whose
/// buffer holds exactly one abst box.
pub fn decode_abst(data: &[u8]) -> Result<AbstBox> {
    AbstBox::decode(data).map(|(abst, _)| abst)
}
