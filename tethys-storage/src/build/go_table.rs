//! GO term table ingestion.
//!
//! Reads a tab-delimited table (`go_id`, `term`, `category`, `level`)
//! into store rows. The level column accepts an integer or the literal
//! `unknown` for terms whose depth was never computed.

use crate::entry::{GoEntry, UNKNOWN_GO_LEVEL};
use std::io::BufRead;
use tethys_core::{TethysError, TethysResult};

pub fn parse_go_table<R: BufRead>(reader: R) -> TethysResult<Vec<GoEntry>> {
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() != 4 {
            return Err(TethysError::Parse(format!(
                "GO table line {}: expected 4 tab-separated columns, found {}",
                idx + 1,
                fields.len()
            )));
        }

        let category = fields[2].trim().parse().map_err(|e: String| {
            TethysError::Parse(format!("GO table line {}: {}", idx + 1, e))
        })?;
        let level_field = fields[3].trim();
        let level = if level_field.eq_ignore_ascii_case("unknown") {
            UNKNOWN_GO_LEVEL
        } else {
            level_field.parse::<i32>().map_err(|_| {
                TethysError::Parse(format!(
                    "GO table line {}: invalid level '{}'",
                    idx + 1,
                    level_field
                ))
            })?
        };

        entries.push(GoEntry {
            go_id: fields[0].trim().to_string(),
            term: fields[1].trim().to_string(),
            category,
            level,
        });
    }

    Ok(entries)
}
