//! Streaming parser for per-database alignment hit tables

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tethys_bio::AlignmentHit;
use tethys_core::{TethysError, TethysResult};

/// The fixed tab-delimited schema:
/// `qseqid sseqid pident length mismatch gapopen qstart qend sstart send
/// evalue bitscore coverage stitle`
pub const HIT_TABLE_COLUMNS: usize = 14;

/// Rows seen and rejected for one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub rows: usize,
    pub rejected: usize,
}

/// What happened to one parsed row
pub enum RowFate {
    /// E-value at or under the cutoff; candidate continues to selection
    Admitted(AlignmentHit),
    /// E-value over the cutoff; row belongs in the unselected ledger
    Rejected(AlignmentHit),
}

/// Streams one database's hit table into typed candidate rows, applying
/// the e-value admission filter.
pub struct HitParser {
    evalue_cutoff: f64,
}

impl HitParser {
    pub fn new(evalue_cutoff: f64) -> Self {
        Self { evalue_cutoff }
    }

    /// Stream every row of `path` through `sink` in file order.
    ///
    /// Blank lines and `#` comment lines are skipped. A missing file or a
    /// malformed row is fatal for this table; the caller decides whether
    /// to skip the database and continue with others.
    pub fn stream<F>(&self, path: &Path, mut sink: F) -> TethysResult<TableCounts>
    where
        F: FnMut(RowFate) -> TethysResult<()>,
    {
        let reader = open_table(path)?;
        let mut counts = TableCounts::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let hit = parse_row(trimmed, path, idx + 1)?;
            counts.rows += 1;
            if hit.evalue > self.evalue_cutoff {
                counts.rejected += 1;
                sink(RowFate::Rejected(hit))?;
            } else {
                sink(RowFate::Admitted(hit))?;
            }
        }

        Ok(counts)
    }
}

fn open_table(path: &Path) -> TethysResult<BufReader<Box<dyn Read>>> {
    let file = File::open(path).map_err(|_| TethysError::HitTableMissing {
        path: path.to_path_buf(),
    })?;

    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(BufReader::new(reader))
}

fn parse_row(line: &str, path: &Path, line_num: usize) -> TethysResult<AlignmentHit> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != HIT_TABLE_COLUMNS {
        return Err(TethysError::HitTableParse {
            path: path.to_path_buf(),
            line: line_num,
            reason: format!(
                "expected {} columns, found {}",
                HIT_TABLE_COLUMNS,
                fields.len()
            ),
        });
    }

    let parse_err = |name: &str, value: &str| TethysError::HitTableParse {
        path: path.to_path_buf(),
        line: line_num,
        reason: format!("invalid {} '{}'", name, value),
    };
    let parse_f64 = |idx: usize, name: &str| -> TethysResult<f64> {
        fields[idx]
            .parse::<f64>()
            .map_err(|_| parse_err(name, fields[idx]))
    };
    let parse_u64 = |idx: usize, name: &str| -> TethysResult<u64> {
        fields[idx]
            .parse::<u64>()
            .map_err(|_| parse_err(name, fields[idx]))
    };

    Ok(AlignmentHit {
        query_id: fields[0].to_string(),
        subject_id: fields[1].to_string(),
        percent_identity: parse_f64(2, "pident")?,
        align_length: parse_u64(3, "length")?,
        mismatches: parse_u64(4, "mismatch")?,
        gap_opens: parse_u64(5, "gapopen")?,
        query_start: parse_u64(6, "qstart")?,
        query_end: parse_u64(7, "qend")?,
        subject_start: parse_u64(8, "sstart")?,
        subject_end: parse_u64(9, "send")?,
        evalue: parse_f64(10, "evalue")?,
        bit_score: parse_f64(11, "bitscore")?,
        coverage: parse_f64(12, "coverage")?,
        subject_title: fields[13].to_string(),
        species: String::new(),
        lineage: String::new(),
        contaminant: false,
        contaminant_type: String::new(),
        informative: false,
        tax_score: 0,
        database: path.to_path_buf(),
        frame: None,
    })
}

/// Helper shared by parser callers: the table's stem names its outputs
pub fn table_stem(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("database");
    // Strip a compression suffix left by file_stem on ".tsv.gz" inputs
    stem.trim_end_matches(".tsv").to_string()
}
