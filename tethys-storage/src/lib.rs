//! Versioned annotation store for taxonomy, GO, and UniProt records.
//!
//! One logical store, two interchangeable physical encodings: an embedded
//! SQLite database and a serialized map blob. Both must answer lookups with
//! byte-identical entry values; operators may swap backends without
//! re-annotating.

pub mod backend;
pub mod build;
pub mod entry;
pub mod store;

pub use backend::{AnnotationBackend, BackendKind, RawUniprotEntry};
pub use entry::{GoCategory, GoEntry, TaxEntry, UniprotEntry, UNKNOWN_GO_LEVEL};
pub use store::{AnnotationStore, StoreCounts, REQUIRED_STORE_VERSION};
