//! Annotation record types served by the store

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Level value for GO terms whose distance from the category root was
/// never computed
pub const UNKNOWN_GO_LEVEL: i32 = -1;

/// One taxonomy record.
///
/// `tax_name` is the storage key and is always held lower-cased; lookups
/// case-fold before comparing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEntry {
    pub tax_id: String,
    pub tax_name: String,
    /// Semicolon-delimited ranks, root to leaf
    pub lineage: String,
}

/// The three Gene Ontology namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GoCategory {
    BiologicalProcess,
    CellularComponent,
    MolecularFunction,
}

impl GoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BiologicalProcess => "biological_process",
            Self::CellularComponent => "cellular_component",
            Self::MolecularFunction => "molecular_function",
        }
    }
}

impl fmt::Display for GoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "biological_process" => Ok(Self::BiologicalProcess),
            "cellular_component" => Ok(Self::CellularComponent),
            "molecular_function" => Ok(Self::MolecularFunction),
            _ => Err(format!("Unknown GO category: {}", s)),
        }
    }
}

/// One Gene Ontology term
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoEntry {
    /// `GO:` followed by eight digits
    pub go_id: String,
    pub term: String,
    pub category: GoCategory,
    /// Distance from the category root, [`UNKNOWN_GO_LEVEL`] if not computed
    pub level: i32,
}

/// One UniProt record with its GO terms resolved.
///
/// The stored row keeps GO ids as a comma list; expansion into full
/// [`GoEntry`] values happens at store-read time, never at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniprotEntry {
    pub uniprot_id: String,
    /// Free-form, pipe-delimited cross-references
    pub database_x_refs: String,
    pub comments: String,
    /// Comma list of KEGG terms
    pub kegg_terms: String,
    pub go_terms: BTreeSet<GoEntry>,
}
