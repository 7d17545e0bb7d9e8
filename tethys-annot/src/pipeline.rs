//! The consolidation pipeline driver.
//!
//! Everything the stages share travels through this context object:
//! configuration, the annotation store, the query record store, and the
//! ledgers. One database is fully parsed, classified, and reduced before
//! the next is opened, and databases are processed in configured order.

use crate::classify::TaxonomyClassifier;
use crate::hits::parser::table_stem;
use crate::hits::{reduce_candidate, HitParser, RowFate, SelectionMode};
use crate::report::{write_hits_fasta, write_hits_tsv, write_records_fasta, LedgerWriter};
use crate::summary::{DatabaseSummary, RunSummary};
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tethys_bio::formats::read_fasta;
use tethys_bio::{AlignmentHit, QueryRecordStore, QuerySequence};
use tethys_core::{Config, ReadingFrame, TethysError, TethysResult};
use tethys_storage::AnnotationStore;
use tracing::{error, info, warn};

/// Load the input transcript set into a fresh record store.
///
/// Residue alphabet decides whether a record is stored as nucleotide or
/// protein; a frame label in the description is carried onto the record.
pub fn load_queries(path: &Path) -> TethysResult<QueryRecordStore> {
    let mut store = QueryRecordStore::new();

    for record in read_fasta(path)? {
        let mut seq = QuerySequence::new(record.id);
        seq = match QuerySequence::detect_kind(&record.sequence) {
            tethys_bio::SequenceKind::Protein => seq.with_protein(record.sequence),
            tethys_bio::SequenceKind::Nucleotide => seq.with_nucleotide(record.sequence),
        };
        if let Some(frame) = record.description.as_deref().and_then(frame_from_description) {
            seq = seq.with_frame(frame);
        }
        store.insert(seq);
    }

    if store.is_empty() {
        return Err(TethysError::InvalidInput(format!(
            "No sequences in input set {}",
            path.display()
        )));
    }
    info!("Loaded {} query sequences from {}", store.len(), path.display());
    Ok(store)
}

fn frame_from_description(desc: &str) -> Option<ReadingFrame> {
    desc.split_whitespace().find_map(|token| {
        token
            .strip_prefix("type:")
            .and_then(|label| label.parse().ok())
            .or_else(|| token.parse().ok())
    })
}

pub struct SimilaritySearch<'a> {
    config: &'a Config,
    store: &'a AnnotationStore,
    records: &'a mut QueryRecordStore,
}

impl<'a> SimilaritySearch<'a> {
    pub fn new(
        config: &'a Config,
        store: &'a AnnotationStore,
        records: &'a mut QueryRecordStore,
    ) -> Self {
        Self {
            config,
            store,
            records,
        }
    }

    /// Consolidate every configured database, then reduce the
    /// per-database winners into one overall best hit per query.
    pub fn run(&mut self) -> TethysResult<RunSummary> {
        let databases = &self.config.similarity.databases;
        if databases.is_empty() {
            return Err(TethysError::Configuration(
                "No hit tables configured for consolidation".to_string(),
            ));
        }
        std::fs::create_dir_all(&self.config.output.directory)?;

        let classifier = TaxonomyClassifier::new(self.store, &self.config.taxonomy)?;
        let mut summary = RunSummary::new(self.records.len());
        let mut per_database: Vec<IndexMap<String, AlignmentHit>> = Vec::new();

        for database in databases {
            match self.process_database(database, &classifier) {
                Ok((winners, db_summary)) => {
                    summary.databases.push(db_summary);
                    per_database.push(winners);
                }
                Err(
                    e @ (TethysError::HitTableMissing { .. } | TethysError::HitTableParse { .. }),
                ) => {
                    error!("Skipping database {}: {}", database.display(), e);
                }
                Err(e) => return Err(e),
            }
        }
        if per_database.is_empty() {
            return Err(TethysError::NoDatabasesUsable);
        }

        let overall = self.reduce_overall(per_database)?;
        for (query_id, hit) in &overall {
            if let Some(record) = self.records.get_mut(query_id) {
                record.set_best_hit(hit.clone());
            }
        }
        self.write_overall(&overall)?;

        let no_hit_queries = self.records.no_hit_queries().count();
        if overall.is_empty() && no_hit_queries == 0 {
            return Err(TethysError::NoSequencesKept);
        }

        summary.queries_with_hit = overall.len();
        summary.overall_contaminants = overall.values().filter(|h| h.contaminant).count();
        summary.no_hit_queries = no_hit_queries;
        summary.write_json(&self.config.output.directory.join("run_summary.json"))?;
        info!("Consolidation finished:\n{}", summary);
        Ok(summary)
    }

    fn process_database(
        &self,
        database: &Path,
        classifier: &TaxonomyClassifier,
    ) -> TethysResult<(IndexMap<String, AlignmentHit>, DatabaseSummary)> {
        let stem = table_stem(database);
        let out = &self.config.output.directory;

        let mut ledger = LedgerWriter::create(&out.join(format!("{}_unselected.tsv", stem)))?;
        let mut winners: IndexMap<String, AlignmentHit> = IndexMap::new();
        let mut unknown_queries = 0usize;

        let spinner = progress_spinner(&format!("Consolidating {}", database.display()));
        let parser = HitParser::new(self.config.similarity.evalue_cutoff);
        let counts = parser.stream(database, |fate| match fate {
            RowFate::Rejected(hit) => ledger.append(&hit),
            RowFate::Admitted(mut hit) => {
                let Some(record) = self.records.get(&hit.query_id) else {
                    unknown_queries += 1;
                    return Ok(());
                };
                hit.frame = record.frame;
                classifier.annotate(&mut hit)?;
                reduce_candidate(&mut winners, hit, SelectionMode::WithinDatabase, &mut ledger)
            }
        })?;
        ledger.flush()?;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        if unknown_queries > 0 {
            warn!(
                "{}: {} rows referenced query ids missing from the input set",
                database.display(),
                unknown_queries
            );
        }

        write_hits_tsv(&out.join(format!("{}_best_hits.tsv", stem)), winners.values())?;
        let contaminants: Vec<&AlignmentHit> =
            winners.values().filter(|h| h.contaminant).collect();
        write_hits_tsv(
            &out.join(format!("{}_best_hits_contam.tsv", stem)),
            contaminants.iter().copied(),
        )?;
        if self.config.output.write_fasta {
            write_hits_fasta(
                &out.join(format!("{}_best_hits.fasta", stem)),
                winners.values(),
                self.records,
            )?;
            write_hits_fasta(
                &out.join(format!("{}_best_hits_contam.fasta", stem)),
                contaminants.iter().copied(),
                self.records,
            )?;
            write_records_fasta(
                &out.join(format!("{}_no_hits.fasta", stem)),
                self.records
                    .iter()
                    .filter(|r| r.is_protein && !winners.contains_key(&r.query_id)),
            )?;
        }

        let db_summary = DatabaseSummary {
            database: database.to_path_buf(),
            rows: counts.rows,
            rejected_by_evalue: counts.rejected,
            winners: winners.len(),
            contaminants: contaminants.len(),
            informative: winners.values().filter(|h| h.informative).count(),
            unselected: ledger.rows(),
            unknown_queries,
        };
        info!(
            "{}: {} rows, {} admitted, {} winners",
            database.display(),
            counts.rows,
            counts.rows - counts.rejected,
            db_summary.winners
        );
        Ok((winners, db_summary))
    }

    /// Mode B: fold the per-database winner maps, in database order, into
    /// one overall winner per query
    fn reduce_overall(
        &self,
        per_database: Vec<IndexMap<String, AlignmentHit>>,
    ) -> TethysResult<IndexMap<String, AlignmentHit>> {
        let out = &self.config.output.directory;
        let mut ledger = LedgerWriter::create(&out.join("overall_unselected.tsv"))?;
        let mut overall: IndexMap<String, AlignmentHit> = IndexMap::new();

        for winners in per_database {
            for (_, hit) in winners {
                reduce_candidate(&mut overall, hit, SelectionMode::CrossDatabase, &mut ledger)?;
            }
        }
        ledger.flush()?;
        Ok(overall)
    }

    fn write_overall(&self, overall: &IndexMap<String, AlignmentHit>) -> TethysResult<()> {
        let out = &self.config.output.directory;

        write_hits_tsv(&out.join("best_overall_hits.tsv"), overall.values())?;
        let contaminants: Vec<&AlignmentHit> =
            overall.values().filter(|h| h.contaminant).collect();
        write_hits_tsv(&out.join("overall_contam.tsv"), contaminants.iter().copied())?;

        if self.config.output.write_fasta {
            write_hits_fasta(&out.join("best_overall_hits.fasta"), overall.values(), self.records)?;
            write_hits_fasta(
                &out.join("overall_contam.fasta"),
                contaminants.iter().copied(),
                self.records,
            )?;
            write_records_fasta(
                &out.join("overall_no_hits.fasta"),
                self.records.no_hit_queries(),
            )?;
        }
        Ok(())
    }
}

/// One spinner per database; silenced when `TETHYS_SILENT` is set
fn progress_spinner(message: &str) -> Option<ProgressBar> {
    if std::env::var("TETHYS_SILENT").is_ok() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Some(spinner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_from_description() {
        assert_eq!(
            frame_from_description("ORF type:complete len:300 (+)"),
            Some(ReadingFrame::Complete)
        );
        assert_eq!(
            frame_from_description("gene=abc 5prime_partial strand=+"),
            Some(ReadingFrame::FivePrimePartial)
        );
        assert_eq!(frame_from_description("plain description"), None);
    }
}
