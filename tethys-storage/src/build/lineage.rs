//! Lineage assembly from parent-pointer taxonomy dumps.
//!
//! Walks parent pointers iteratively with a visited-set guard: a
//! malformed dump with a parent cycle terminates at the point the cycle
//! closes instead of recursing forever.

use std::collections::{HashMap, HashSet};
use tracing::warn;

/// One node of a parent-pointer taxonomy dump
#[derive(Debug, Clone)]
pub struct TaxonomyNode {
    pub name: String,
    /// `None` marks a root
    pub parent_id: Option<String>,
}

/// Assemble the semicolon-delimited lineage for `tax_id`, root to leaf.
///
/// A missing node yields an empty lineage; a missing parent truncates the
/// walk at the last known ancestor.
pub fn assemble_lineage(nodes: &HashMap<String, TaxonomyNode>, tax_id: &str) -> String {
    let mut names: Vec<&str> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = Some(tax_id);

    while let Some(id) = current {
        if !visited.insert(id) {
            warn!("Taxonomy parent cycle at '{}'; truncating lineage", id);
            break;
        }
        let Some(node) = nodes.get(id) else {
            break;
        };
        names.push(&node.name);
        current = node.parent_id.as_deref();
    }

    names.reverse();
    names.join(";")
}
