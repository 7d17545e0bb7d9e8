//! The id-keyed store of query records

use super::types::QuerySequence;
use indexmap::IndexMap;
use tracing::warn;

/// All query records for one pipeline run, keyed by query id.
///
/// Iteration order is input order, so downstream output files are stable
/// across runs. Owned by the pipeline driver; there are no process-wide
/// globals behind this.
#[derive(Debug, Default)]
pub struct QueryRecordStore {
    records: IndexMap<String, QuerySequence>,
}

impl QueryRecordStore {
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }

    /// Insert a freshly loaded record. A duplicate id keeps the first
    /// record and drops the newcomer.
    pub fn insert(&mut self, record: QuerySequence) {
        if self.records.contains_key(&record.query_id) {
            warn!("Duplicate query id '{}' ignored", record.query_id);
            return;
        }
        self.records.insert(record.query_id.clone(), record);
    }

    pub fn get(&self, query_id: &str) -> Option<&QuerySequence> {
        self.records.get(query_id)
    }

    pub fn get_mut(&mut self, query_id: &str) -> Option<&mut QuerySequence> {
        self.records.get_mut(query_id)
    }

    pub fn contains(&self, query_id: &str) -> bool {
        self.records.contains_key(query_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuerySequence> {
        self.records.values()
    }

    /// Protein-coding queries that ended the run without a winning hit
    pub fn no_hit_queries(&self) -> impl Iterator<Item = &QuerySequence> {
        self.records
            .values()
            .filter(|r| r.is_protein && !r.is_database_hit)
    }

    /// Queries that ended the run with a winning hit
    pub fn hit_queries(&self) -> impl Iterator<Item = &QuerySequence> {
        self.records.values().filter(|r| r.is_database_hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut store = QueryRecordStore::new();
        store.insert(QuerySequence::new("q1".to_string()).with_nucleotide(b"ACGT".to_vec()));

        assert_eq!(store.len(), 1);
        assert!(store.contains("q1"));
        assert_eq!(store.get("q1").unwrap().seq_length, 4);
    }

    #[test]
    fn test_duplicate_id_keeps_first_record() {
        let mut store = QueryRecordStore::new();
        store.insert(QuerySequence::new("q1".to_string()).with_nucleotide(b"ACGT".to_vec()));
        store.insert(QuerySequence::new("q1".to_string()).with_nucleotide(b"AC".to_vec()));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("q1").unwrap().seq_length, 4);
    }

    #[test]
    fn test_iteration_preserves_input_order() {
        let mut store = QueryRecordStore::new();
        for id in ["zeta", "alpha", "mu"] {
            store.insert(QuerySequence::new(id.to_string()));
        }

        let ids: Vec<&str> = store.iter().map(|r| r.query_id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_no_hit_queries_are_protein_without_hits() {
        let mut store = QueryRecordStore::new();
        store.insert(QuerySequence::new("prot".to_string()).with_protein(b"MEEPQ".to_vec()));
        store.insert(QuerySequence::new("nuc".to_string()).with_nucleotide(b"ACGT".to_vec()));

        let no_hits: Vec<&str> = store
            .no_hit_queries()
            .map(|r| r.query_id.as_str())
            .collect();
        assert_eq!(no_hits, vec!["prot"]);
    }
}
