//! Taxonomy dump ingestion.
//!
//! Reads a tab-delimited parent-pointer dump (`tax_id`, `parent_id`,
//! `name`, one node per line) and assembles one root-to-leaf lineage
//! string per node. A root points at itself, at `0`, or at nothing.

use super::lineage::{assemble_lineage, TaxonomyNode};
use crate::entry::TaxEntry;
use std::collections::HashMap;
use std::io::BufRead;
use tethys_core::{TethysError, TethysResult};

/// Parse a dump into store rows, in input order.
///
/// Blank lines and `#` comment lines are skipped; a row with the wrong
/// column count or an empty id/name fails the parse. Lineages are built
/// after the whole dump is read, so forward references to parents are
/// fine.
pub fn parse_taxonomy_dump<R: BufRead>(reader: R) -> TethysResult<Vec<TaxEntry>> {
    let mut nodes: HashMap<String, TaxonomyNode> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() != 3 {
            return Err(TethysError::Parse(format!(
                "Taxonomy dump line {}: expected 3 tab-separated columns, found {}",
                idx + 1,
                fields.len()
            )));
        }

        let tax_id = fields[0].trim().to_string();
        let parent = fields[1].trim();
        let name = fields[2].trim().to_string();
        if tax_id.is_empty() || name.is_empty() {
            return Err(TethysError::Parse(format!(
                "Taxonomy dump line {}: empty tax_id or name",
                idx + 1
            )));
        }

        let parent_id = if parent.is_empty() || parent == "0" || parent == tax_id {
            None
        } else {
            Some(parent.to_string())
        };

        if !nodes.contains_key(&tax_id) {
            order.push(tax_id.clone());
        }
        nodes.insert(tax_id, TaxonomyNode { name, parent_id });
    }

    Ok(order
        .iter()
        .map(|id| {
            let node = &nodes[id];
            TaxEntry {
                tax_id: id.clone(),
                tax_name: node.name.clone(),
                lineage: assemble_lineage(&nodes, id),
            }
        })
        .collect())
}
