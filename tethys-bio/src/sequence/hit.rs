//! The annotated alignment hit attached to a query record

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tethys_core::ReadingFrame;

/// One alignment result, fully annotated.
///
/// Carries the raw alignment statistics from the hit table plus everything
/// the taxonomy classifier attaches before selection: species, lineage,
/// contaminant status, and the relevance score. The same shape serves as
/// the ephemeral candidate during selection and as the winning hit stored
/// on a [`super::QuerySequence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentHit {
    pub query_id: String,
    pub subject_id: String,
    pub subject_title: String,
    pub percent_identity: f64,
    pub align_length: u64,
    pub mismatches: u64,
    pub gap_opens: u64,
    pub query_start: u64,
    pub query_end: u64,
    pub subject_start: u64,
    pub subject_end: u64,
    pub evalue: f64,
    pub bit_score: f64,
    /// Fraction of the query spanned by the alignment, as a percentage
    pub coverage: f64,
    /// Organism name parsed from the subject title, empty if none matched
    pub species: String,
    /// Semicolon-delimited lineage for the species, root to leaf
    pub lineage: String,
    pub contaminant: bool,
    /// The configured taxon that matched the lineage, empty if clean
    pub contaminant_type: String,
    pub informative: bool,
    /// Taxonomic relevance against the query organism's own lineage
    pub tax_score: i32,
    /// Hit table this row came from
    pub database: PathBuf,
    pub frame: Option<ReadingFrame>,
}

impl AlignmentHit {
    /// E-value with zero clamped away so `log10` is defined
    pub fn normalized_evalue(&self) -> f64 {
        if self.evalue == 0.0 {
            1e-120
        } else {
            self.evalue
        }
    }
}
