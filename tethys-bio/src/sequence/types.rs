use super::hit::AlignmentHit;
use serde::{Deserialize, Serialize};
use std::fmt;
use tethys_core::ReadingFrame;

/// Residue alphabet of a sequence payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceKind {
    Nucleotide,
    Protein,
}

/// One input transcript and its accumulating annotation.
///
/// Created once per input sequence when the query set is loaded, mutated
/// by the consolidation stages, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySequence {
    pub query_id: String,
    pub nucleotide: Option<Vec<u8>>,
    pub protein: Option<Vec<u8>>,
    pub seq_length: usize,
    pub frame: Option<ReadingFrame>,
    pub is_protein: bool,
    pub is_database_hit: bool,
    pub is_informative: bool,
    /// Overwritten whenever a better candidate survives selection
    pub best_hit: Option<AlignmentHit>,
}

impl QuerySequence {
    pub fn new(query_id: String) -> Self {
        Self {
            query_id,
            nucleotide: None,
            protein: None,
            seq_length: 0,
            frame: None,
            is_protein: false,
            is_database_hit: false,
            is_informative: false,
            best_hit: None,
        }
    }

    pub fn with_nucleotide(mut self, seq: Vec<u8>) -> Self {
        self.seq_length = seq.len();
        self.nucleotide = Some(seq);
        self
    }

    pub fn with_protein(mut self, seq: Vec<u8>) -> Self {
        self.seq_length = seq.len();
        self.is_protein = true;
        self.protein = Some(seq);
        self
    }

    pub fn with_frame(mut self, frame: ReadingFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Residues identifying a protein alphabet
    pub fn detect_kind(seq: &[u8]) -> SequenceKind {
        let protein_chars = b"EFILPQXZ";
        let has_protein = seq
            .iter()
            .any(|&c| protein_chars.contains(&c.to_ascii_uppercase()));

        if has_protein {
            SequenceKind::Protein
        } else {
            SequenceKind::Nucleotide
        }
    }

    /// Record a winning hit, updating the derived flags
    pub fn set_best_hit(&mut self, hit: AlignmentHit) {
        self.is_database_hit = true;
        self.is_informative = hit.informative;
        if self.frame.is_none() {
            self.frame = hit.frame;
        }
        self.best_hit = Some(hit);
    }

    /// Payload written to FASTA outputs: nucleotide if present, else protein
    pub fn fasta_payload(&self) -> Option<&[u8]> {
        self.nucleotide
            .as_deref()
            .or(self.protein.as_deref())
    }
}

impl fmt::Display for QuerySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fasta_payload() {
            Some(seq) => write!(f, "{}", String::from_utf8_lossy(seq)),
            None => Ok(()),
        }
    }
}
