//! Sequence records, FASTA I/O, and taxonomy string parsing for Tethys

pub mod formats;
pub mod sequence;
pub mod taxonomy;

pub use sequence::{AlignmentHit, QueryRecordStore, QuerySequence, SequenceKind};
