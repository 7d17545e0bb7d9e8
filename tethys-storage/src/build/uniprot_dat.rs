//! UniProt flat-file ingestion.
//!
//! Reads the line-prefix tagged format: `ID` opens a record, `DR` carries
//! cross-references (with `GO` and `KEGG` sub-tags dispatched into their
//! own fields), `CC` carries comment text, `//` terminates the record.

use crate::backend::RawUniprotEntry;
use std::io::BufRead;
use tethys_core::TethysResult;
use tracing::warn;

/// Parse flat-file records into raw store rows.
///
/// Records without an `ID` line are dropped with a warning; everything
/// else is carried verbatim into the row fields.
pub fn parse_uniprot_dat<R: BufRead>(reader: R) -> TethysResult<Vec<RawUniprotEntry>> {
    let mut entries = Vec::new();
    let mut current: Option<RecordAccumulator> = None;

    for line in reader.lines() {
        let line = line?;

        if let Some(accession) = tagged(&line, "ID") {
            let accession = accession
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_string();
            current = Some(RecordAccumulator::new(accession));
            continue;
        }

        if line.starts_with("//") {
            match current.take() {
                Some(acc) if !acc.accession.is_empty() => entries.push(acc.build()),
                Some(_) => warn!("Dropping flat-file record with empty ID line"),
                None => {}
            }
            continue;
        }

        let Some(acc) = current.as_mut() else {
            continue;
        };

        if let Some(rest) = tagged(&line, "DR") {
            acc.cross_reference(rest);
        } else if let Some(rest) = tagged(&line, "CC") {
            acc.comment(rest);
        }
    }

    if current.is_some() {
        warn!("Flat-file input ended inside an unterminated record; dropping it");
    }

    Ok(entries)
}

/// Strip a two-letter line tag and its padding, if present
fn tagged<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    line.strip_prefix(tag)
        .filter(|rest| rest.starts_with(' '))
        .map(|rest| rest.trim_start())
}

struct RecordAccumulator {
    accession: String,
    xrefs: Vec<String>,
    comments: Vec<String>,
    kegg: Vec<String>,
    go_ids: Vec<String>,
}

impl RecordAccumulator {
    fn new(accession: String) -> Self {
        Self {
            accession,
            xrefs: Vec::new(),
            comments: Vec::new(),
            kegg: Vec::new(),
            go_ids: Vec::new(),
        }
    }

    /// `DR   GO; GO:0005737; C:cytoplasm; IDA:UniProtKB.`
    /// `DR   KEGG; hsa:7157; -.`
    fn cross_reference(&mut self, rest: &str) {
        let mut fields = rest.split(';').map(|f| f.trim().trim_end_matches('.'));
        let Some(database) = fields.next() else {
            return;
        };

        match database {
            "GO" => {
                if let Some(id) = fields.next().filter(|id| !id.is_empty()) {
                    self.go_ids.push(id.to_string());
                }
            }
            "KEGG" => {
                if let Some(term) = fields.next().filter(|t| !t.is_empty()) {
                    self.kegg.push(term.to_string());
                }
            }
            _ => {
                let rest = rest.trim_end_matches('.').trim();
                if !rest.is_empty() {
                    self.xrefs.push(rest.to_string());
                }
            }
        }
    }

    fn comment(&mut self, rest: &str) {
        if !rest.is_empty() {
            self.comments.push(rest.to_string());
        }
    }

    fn build(self) -> RawUniprotEntry {
        RawUniprotEntry {
            uniprot_id: self.accession,
            database_x_refs: self.xrefs.join("|"),
            comments: self.comments.join(" "),
            kegg_terms: self.kegg.join(","),
            go_csv: self.go_ids.join(","),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const SAMPLE: &str = "\
ID   P04637 Reviewed; 393 AA.
DR   GO; GO:0005634; C:nucleus; IDA:UniProtKB.
DR   GO; GO:0003677; F:DNA binding; IDA:UniProtKB.
DR   KEGG; hsa:7157; -.
DR   PDB; 1TUP; X-ray; 2.20 A.
CC   -!- FUNCTION: Acts as a tumor suppressor.
CC       Induces growth arrest or apoptosis.
//
ID   Q9H0H5 Reviewed; 100 AA.
DR   KEGG; hsa:1234; -.
//
";

    #[test]
    fn test_records_parse_with_dispatched_tags() {
        let entries = parse_uniprot_dat(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(entries.len(), 2);

        let p53 = &entries[0];
        assert_eq!(p53.uniprot_id, "P04637");
        assert_eq!(p53.go_csv, "GO:0005634,GO:0003677");
        assert_eq!(p53.kegg_terms, "hsa:7157");
        assert_eq!(p53.database_x_refs, "PDB; 1TUP; X-ray; 2.20 A");
        assert!(p53.comments.contains("tumor suppressor"));

        assert_eq!(entries[1].uniprot_id, "Q9H0H5");
        assert_eq!(entries[1].go_csv, "");
    }

    #[test]
    fn test_unterminated_record_is_dropped() {
        let input = "ID   P00001 Reviewed; 10 AA.\nDR   KEGG; x:1; -.\n";
        let entries = parse_uniprot_dat(Cursor::new(input)).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_lines_outside_records_are_ignored() {
        let input = "DR   GO; GO:0000001; P:x; IEA.\n//\nID   P00002 Reviewed.\n//\n";
        let entries = parse_uniprot_dat(Cursor::new(input)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].uniprot_id, "P00002");
    }

    #[test]
    fn test_cc_continuation_lines_join_comments() {
        let entries = parse_uniprot_dat(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(
            entries[0].comments,
            "-!- FUNCTION: Acts as a tumor suppressor. Induces growth arrest or apoptosis."
        );
    }
}
