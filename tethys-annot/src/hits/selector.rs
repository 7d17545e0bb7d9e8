//! Deterministic best-hit selection.
//!
//! Two reduction modes share one comparator shape. Within a database the
//! e-value band gates the tie-break; across databases every candidate
//! already won its own database, so the comparator goes straight to the
//! tie-break with a wider coverage band.
//!
//! The tie-break chain is not a mathematical total order, and selection
//! order is therefore significant: candidates must be folded in file
//! order, databases in configured order. The winner maps are
//! insertion-ordered for the same reason.

use crate::report::LedgerWriter;
use indexmap::map::Entry;
use indexmap::IndexMap;
use tethys_bio::AlignmentHit;
use tethys_core::TethysResult;

/// Orders of magnitude within which two e-values are considered equivalent
const EVALUE_BAND: f64 = 7.0;
/// Coverage-point band for the within-database tie-break
const COVERAGE_BAND_WITHIN: f64 = 4.0;
/// Coverage-point band for the cross-database tie-break
const COVERAGE_BAND_CROSS: f64 = 7.0;

/// Which reduction is being performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// One winner per query within a single database
    WithinDatabase,
    /// One overall winner per query across the per-database winners
    CrossDatabase,
}

/// Does `challenger` beat `incumbent`? Ties keep the incumbent, so
/// feeding a candidate against itself never replaces the entry.
pub fn is_better(challenger: &AlignmentHit, incumbent: &AlignmentHit, mode: SelectionMode) -> bool {
    match mode {
        SelectionMode::WithinDatabase => {
            let log_delta =
                (challenger.normalized_evalue().log10() - incumbent.normalized_evalue().log10()).abs();
            if log_delta >= EVALUE_BAND {
                // Confidence differs too much for the tie-break to matter
                return challenger.normalized_evalue() < incumbent.normalized_evalue();
            }
            tie_break(challenger, incumbent, COVERAGE_BAND_WITHIN)
        }
        SelectionMode::CrossDatabase => tie_break(challenger, incumbent, COVERAGE_BAND_CROSS),
    }
}

fn tie_break(challenger: &AlignmentHit, incumbent: &AlignmentHit, coverage_band: f64) -> bool {
    if challenger.contaminant != incumbent.contaminant {
        return !challenger.contaminant;
    }
    if (challenger.coverage - incumbent.coverage).abs() >= coverage_band {
        return challenger.coverage > incumbent.coverage;
    }
    if challenger.informative != incumbent.informative {
        return challenger.informative;
    }
    challenger.align_length > incumbent.align_length
}

/// Fold one candidate into a winner map.
///
/// A single linear pass with no backtracking: the loser of every
/// comparison is appended to the unselected ledger, and the map entry is
/// replaced only when the challenger wins.
pub fn reduce_candidate(
    winners: &mut IndexMap<String, AlignmentHit>,
    candidate: AlignmentHit,
    mode: SelectionMode,
    ledger: &mut LedgerWriter,
) -> TethysResult<()> {
    match winners.entry(candidate.query_id.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(candidate);
        }
        Entry::Occupied(mut slot) => {
            if is_better(&candidate, slot.get(), mode) {
                let loser = slot.insert(candidate);
                ledger.append(&loser)?;
            } else {
                ledger.append(&candidate)?;
            }
        }
    }
    Ok(())
}
