//! TSV and FASTA writers for the five-way result sets

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tethys_bio::formats::write_fasta;
use tethys_bio::{AlignmentHit, QueryRecordStore, QuerySequence};
use tethys_core::TethysResult;

/// Column order shared by every hit TSV: the raw table schema followed by
/// the annotation the classifier attached
const RESULT_COLUMNS: [&str; 21] = [
    "qseqid",
    "sseqid",
    "pident",
    "length",
    "mismatch",
    "gapopen",
    "qstart",
    "qend",
    "sstart",
    "send",
    "evalue",
    "bitscore",
    "coverage",
    "stitle",
    "species",
    "lineage",
    "contaminant",
    "contaminant_type",
    "informative",
    "tax_score",
    "frame",
];

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn render_row(hit: &AlignmentHit) -> String {
    let fields: Vec<String> = vec![
        hit.query_id.clone(),
        hit.subject_id.clone(),
        hit.percent_identity.to_string(),
        hit.align_length.to_string(),
        hit.mismatches.to_string(),
        hit.gap_opens.to_string(),
        hit.query_start.to_string(),
        hit.query_end.to_string(),
        hit.subject_start.to_string(),
        hit.subject_end.to_string(),
        format!("{:e}", hit.evalue),
        hit.bit_score.to_string(),
        hit.coverage.to_string(),
        hit.subject_title.clone(),
        hit.species.clone(),
        hit.lineage.clone(),
        yes_no(hit.contaminant).to_string(),
        hit.contaminant_type.clone(),
        yes_no(hit.informative).to_string(),
        hit.tax_score.to_string(),
        hit.frame.map(|f| f.to_string()).unwrap_or_default(),
    ];
    fields.join("\t")
}

/// Append-only writer for an unselected ledger.
///
/// Every row is a hit that lost a comparison or failed the e-value
/// filter; rows are never rewritten.
pub struct LedgerWriter {
    writer: BufWriter<File>,
    rows: usize,
}

impl LedgerWriter {
    pub fn create(path: &Path) -> TethysResult<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", RESULT_COLUMNS.join("\t"))?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn append(&mut self, hit: &AlignmentHit) -> TethysResult<()> {
        writeln!(self.writer, "{}", render_row(hit))?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> TethysResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write a hit result set as TSV with a header row
pub fn write_hits_tsv<'a, I>(path: &Path, hits: I) -> TethysResult<usize>
where
    I: IntoIterator<Item = &'a AlignmentHit>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{}", RESULT_COLUMNS.join("\t"))?;

    let mut rows = 0usize;
    for hit in hits {
        writeln!(writer, "{}", render_row(hit))?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

/// Write the original sequences behind a hit result set as FASTA.
/// Queries whose record carries no payload are skipped.
pub fn write_hits_fasta<'a, I>(
    path: &Path,
    hits: I,
    records: &QueryRecordStore,
) -> TethysResult<usize>
where
    I: IntoIterator<Item = &'a AlignmentHit>,
{
    let entries: Vec<(&str, &[u8])> = hits
        .into_iter()
        .filter_map(|hit| {
            records
                .get(&hit.query_id)
                .and_then(|r| r.fasta_payload())
                .map(|payload| (hit.query_id.as_str(), payload))
        })
        .collect();
    write_fasta(path, entries)
}

/// Write a set of query records as FASTA
pub fn write_records_fasta<'a, I>(path: &Path, records: I) -> TethysResult<usize>
where
    I: IntoIterator<Item = &'a QuerySequence>,
{
    let entries: Vec<(&str, &[u8])> = records
        .into_iter()
        .filter_map(|r| r.fasta_payload().map(|payload| (r.query_id.as_str(), payload)))
        .collect();
    write_fasta(path, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tethys_core::ReadingFrame;

    fn sample_hit() -> AlignmentHit {
        AlignmentHit {
            query_id: "q1".to_string(),
            subject_id: "sp|P04637|P53_HUMAN".to_string(),
            subject_title: "Cellular tumor antigen p53 OS=Homo sapiens OX=9606".to_string(),
            percent_identity: 97.5,
            align_length: 300,
            mismatches: 7,
            gap_opens: 0,
            query_start: 1,
            query_end: 300,
            subject_start: 1,
            subject_end: 300,
            evalue: 1e-50,
            bit_score: 250.0,
            coverage: 90.0,
            species: "Homo sapiens".to_string(),
            lineage: "cellular organisms;Eukaryota;Metazoa;Homo sapiens".to_string(),
            contaminant: false,
            contaminant_type: String::new(),
            informative: true,
            tax_score: 7,
            database: PathBuf::from("swissprot.tsv"),
            frame: Some(ReadingFrame::Complete),
        }
    }

    #[test]
    fn test_tsv_has_header_and_annotated_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("best_hits.tsv");
        let hit = sample_hit();

        let rows = write_hits_tsv(&path, [&hit]).unwrap();
        assert_eq!(rows, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("qseqid\tsseqid"));
        assert!(header.ends_with("tax_score\tframe"));

        let row = lines.next().unwrap();
        let fields: Vec<&str> = row.split('\t').collect();
        assert_eq!(fields.len(), RESULT_COLUMNS.len());
        assert_eq!(fields[0], "q1");
        assert_eq!(fields[10], "1e-50");
        assert_eq!(fields[14], "Homo sapiens");
        assert_eq!(fields[16], "no");
        assert_eq!(fields[18], "yes");
        assert_eq!(fields[20], "complete");
    }

    #[test]
    fn test_ledger_appends_and_counts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unselected.tsv");
        let mut ledger = LedgerWriter::create(&path).unwrap();

        ledger.append(&sample_hit()).unwrap();
        ledger.append(&sample_hit()).unwrap();
        ledger.flush().unwrap();
        assert_eq!(ledger.rows(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3); // header + 2 rows
    }

    #[test]
    fn test_fasta_written_from_stored_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("best_hits.fasta");

        let mut records = QueryRecordStore::new();
        records.insert(
            QuerySequence::new("q1".to_string()).with_nucleotide(b"ACGTACGT".to_vec()),
        );

        let written = write_hits_fasta(&path, [&sample_hit()], &records).unwrap();
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(">q1\n"));
        assert!(content.contains("ACGTACGT"));
    }

    #[test]
    fn test_fasta_skips_queries_without_payload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("best_hits.fasta");
        let records = QueryRecordStore::new(); // q1 never loaded

        let written = write_hits_fasta(&path, [&sample_hit()], &records).unwrap();
        assert_eq!(written, 0);
    }
}
