//! Organism-name extraction from hit titles and lineage string helpers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Bracketed organism names, e.g. "...protein [Homo sapiens]"
    static ref BRACKET_RE: Regex = Regex::new(r"\[([^\[\]]+)\]").expect("valid regex");
    /// UniProt-style organism field terminated by the next two-letter tag,
    /// e.g. "... OS=Homo sapiens OX=9606 GN=TP53"
    static ref OS_RE: Regex = Regex::new(r"OS=(.*?)\s+[A-Z]{2}=").expect("valid regex");
    /// Organism field with nothing after it
    static ref OS_TAIL_RE: Regex = Regex::new(r"OS=(.*)$").expect("valid regex");
}

/// Extract the organism name from a subject title.
///
/// Two title vocabularies are recognized: the UniProt `OS=` field, and a
/// trailing bracketed organism name (the last bracketed group in the
/// title). Returns `None` when neither convention matches.
pub fn extract_species(title: &str) -> Option<String> {
    if title.contains("OS=") {
        let name = OS_RE
            .captures(title)
            .or_else(|| OS_TAIL_RE.captures(title))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())?;
        return if name.is_empty() { None } else { Some(name) };
    }

    BRACKET_RE
        .captures_iter(title)
        .last()
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Split a lineage string into its ranks, trimmed, empty ranks dropped
pub fn lineage_ranks(lineage: &str) -> Vec<&str> {
    lineage
        .split(';')
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect()
}

/// Case-insensitive substring test against a lineage string
pub fn lineage_contains(lineage: &str, taxon: &str) -> bool {
    if taxon.is_empty() {
        return false;
    }
    lineage.to_lowercase().contains(&taxon.to_lowercase())
}
