//! Physical store encodings behind one lookup contract

mod serial;
mod sqlite;

pub use serial::{SerialBackend, SerialData};
pub use sqlite::SqliteBackend;

use crate::entry::{GoEntry, TaxEntry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tethys_core::{StoreVersion, TethysResult};

/// Which physical encoding a store uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    /// Embedded SQLite tables
    Relational,
    /// One bincode blob holding equivalent maps
    Serialized,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relational => write!(f, "relational"),
            Self::Serialized => write!(f, "serialized"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relational" | "sqlite" => Ok(Self::Relational),
            "serialized" | "serial" => Ok(Self::Serialized),
            _ => Err(format!("Unknown store backend: {}", s)),
        }
    }
}

/// A UniProt row as stored: GO ids still a comma list, unexpanded.
///
/// Expansion to full [`GoEntry`] values is the store facade's job at read
/// time, so both encodings persist the identical shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawUniprotEntry {
    pub uniprot_id: String,
    pub database_x_refs: String,
    pub comments: String,
    pub kegg_terms: String,
    /// Comma-delimited GO ids
    pub go_csv: String,
}

/// Lookup contract both encodings satisfy.
///
/// Keys arrive normalized: taxonomy names are already lower-cased, GO ids
/// and accessions are exact. Fallback and caching policy live above this
/// trait, in [`crate::store::AnnotationStore`].
pub trait AnnotationBackend: Send {
    /// The version stamp embedded in the store artifact
    fn version(&self) -> TethysResult<StoreVersion>;

    /// Exact-match taxonomy lookup on a lower-cased name key
    fn tax_entry(&self, name_key: &str) -> TethysResult<Option<TaxEntry>>;

    /// Exact-match GO term lookup
    fn go_entry(&self, go_id: &str) -> TethysResult<Option<GoEntry>>;

    /// Exact-match UniProt lookup, GO ids left unexpanded
    fn uniprot_entry(&self, accession: &str) -> TethysResult<Option<RawUniprotEntry>>;

    /// Row counts per table: (taxonomy, go, uniprot)
    fn counts(&self) -> TethysResult<(u64, u64, u64)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("relational".parse::<BackendKind>().unwrap(), BackendKind::Relational);
        assert_eq!("sqlite".parse::<BackendKind>().unwrap(), BackendKind::Relational);
        assert_eq!("serialized".parse::<BackendKind>().unwrap(), BackendKind::Serialized);
        assert!("postgres".parse::<BackendKind>().is_err());
    }
}
