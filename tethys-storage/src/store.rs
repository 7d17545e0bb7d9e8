//! The annotation store facade: version gate, lookup fallback, memo cache

use crate::backend::{AnnotationBackend, BackendKind, SerialBackend, SqliteBackend};
use crate::entry::{GoEntry, TaxEntry, UniprotEntry};
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tethys_core::{StoreVersion, TethysError, TethysResult};
use tracing::debug;

/// The store version this release reads
pub const REQUIRED_STORE_VERSION: StoreVersion = StoreVersion { major: 2, minor: 0 };

/// Table sizes, for operator inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub taxonomy: u64,
    pub go: u64,
    pub uniprot: u64,
}

enum StoreState {
    /// Version stamp matched; reads allowed
    Ready,
    /// Version stamp did not match; every read is refused. Terminal.
    Incompatible,
}

/// Versioned lookup over taxonomy, GO, and UniProt records.
///
/// Exactly one backend is active per store instance, chosen at open time.
/// After a successful open the store is logically read-only; the GO memo
/// cache is the only mutable state and it is append-only and key-scoped.
pub struct AnnotationStore {
    backend: Box<dyn AnnotationBackend>,
    path: PathBuf,
    version: StoreVersion,
    required: StoreVersion,
    state: StoreState,
    go_cache: DashMap<String, GoEntry>,
}

impl AnnotationStore {
    /// Open a store and gate it against [`REQUIRED_STORE_VERSION`].
    ///
    /// A missing path or an unreadable artifact fails the open. A version
    /// mismatch does not fail the open; the store lands in the
    /// incompatible state where every read returns the version error, so
    /// operators can still inspect the stamp.
    pub fn open(kind: BackendKind, path: &Path) -> TethysResult<Self> {
        Self::open_with_required(kind, path, REQUIRED_STORE_VERSION)
    }

    /// Open gating against an explicit required version
    pub fn open_with_required(
        kind: BackendKind,
        path: &Path,
        required: StoreVersion,
    ) -> TethysResult<Self> {
        if !path.exists() {
            return Err(TethysError::StoreMissing {
                path: path.to_path_buf(),
            });
        }

        let backend: Box<dyn AnnotationBackend> = match kind {
            BackendKind::Relational => Box::new(SqliteBackend::open(path)?),
            BackendKind::Serialized => Box::new(SerialBackend::open(path)?),
        };

        let version = backend.version()?;
        let state = if version.is_compatible(&required) {
            StoreState::Ready
        } else {
            StoreState::Incompatible
        };
        debug!(
            "Opened {} annotation store {} (version {})",
            kind,
            path.display(),
            version
        );

        Ok(Self {
            backend,
            path: path.to_path_buf(),
            version,
            required,
            state,
            go_cache: DashMap::new(),
        })
    }

    pub fn version(&self) -> StoreVersion {
        self.version
    }

    pub fn is_compatible(&self) -> bool {
        matches!(self.state, StoreState::Ready)
    }

    fn ensure_ready(&self) -> TethysResult<()> {
        match self.state {
            StoreState::Ready => Ok(()),
            StoreState::Incompatible => Err(TethysError::StoreVersion {
                path: self.path.clone(),
                found: self.version.to_string(),
                required: self.required.to_string(),
            }),
        }
    }

    /// Taxonomy lookup with the progressive-truncation fallback.
    ///
    /// Organism names in hit titles are often more specific than the
    /// taxonomy table's canonical entries (subspecies, strain), so on a
    /// miss the last space-delimited token is stripped and the lookup
    /// retried until the name has no spaces left.
    pub fn tax_entry(&self, name: &str) -> TethysResult<Option<TaxEntry>> {
        self.ensure_ready()?;

        let mut key = name.trim().to_lowercase();
        if key.is_empty() {
            return Ok(None);
        }
        loop {
            if let Some(entry) = self.backend.tax_entry(&key)? {
                return Ok(Some(entry));
            }
            match key.rfind(' ') {
                Some(pos) => key.truncate(pos),
                None => return Ok(None),
            }
            // rfind can leave trailing whitespace when names carry runs of
            // spaces; fold it away before retrying
            while key.ends_with(' ') {
                key.pop();
            }
        }
    }

    /// GO term lookup. Successful lookups are memoized for the life of
    /// the store instance; callers cannot observe the cache.
    pub fn go_entry(&self, go_id: &str) -> TethysResult<Option<GoEntry>> {
        self.ensure_ready()?;

        if let Some(cached) = self.go_cache.get(go_id) {
            return Ok(Some(cached.clone()));
        }
        let found = self.backend.go_entry(go_id)?;
        if let Some(entry) = &found {
            self.go_cache.insert(go_id.to_string(), entry.clone());
        }
        Ok(found)
    }

    /// UniProt lookup. The stored comma list of GO ids is expanded into
    /// full entries here, at read time; ids unknown to the GO table are
    /// dropped.
    pub fn uniprot_entry(&self, accession: &str) -> TethysResult<Option<UniprotEntry>> {
        self.ensure_ready()?;

        let raw = match self.backend.uniprot_entry(accession)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let mut go_terms = BTreeSet::new();
        for id in raw.go_csv.split(',') {
            let id = id.trim();
            if id.is_empty() {
                continue;
            }
            if let Some(entry) = self.go_entry(id)? {
                go_terms.insert(entry);
            }
        }

        Ok(Some(UniprotEntry {
            uniprot_id: raw.uniprot_id,
            database_x_refs: raw.database_x_refs,
            comments: raw.comments,
            kegg_terms: raw.kegg_terms,
            go_terms,
        }))
    }

    pub fn counts(&self) -> TethysResult<StoreCounts> {
        self.ensure_ready()?;
        let (taxonomy, go, uniprot) = self.backend.counts()?;
        Ok(StoreCounts {
            taxonomy,
            go,
            uniprot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RawUniprotEntry, SerialData};
    use crate::build::SerialStoreBuilder;
    use crate::entry::GoCategory;
    use tempfile::TempDir;

    fn build_store(dir: &TempDir, version: &str) -> PathBuf {
        let mut builder = SerialStoreBuilder::new();
        builder.add_taxon(TaxEntry {
            tax_id: "562".to_string(),
            tax_name: "Escherichia coli".to_string(),
            lineage: "cellular organisms;Bacteria;Proteobacteria;Escherichia;Escherichia coli"
                .to_string(),
        });
        builder.add_go(GoEntry {
            go_id: "GO:00000001".to_string(),
            term: "mitochondrion inheritance".to_string(),
            category: GoCategory::BiologicalProcess,
            level: 6,
        });
        builder.add_uniprot(RawUniprotEntry {
            uniprot_id: "P04637".to_string(),
            database_x_refs: "PDB:1TUP|RefSeq:NP_000537.3".to_string(),
            comments: "FUNCTION: Acts as a tumor suppressor.".to_string(),
            kegg_terms: "hsa:7157".to_string(),
            go_csv: "GO:00000001,GO:99999999".to_string(),
        });

        let path = dir.path().join("store.bin");
        builder
            .finish(&path, &version.parse().unwrap())
            .unwrap();
        path
    }

    #[test]
    fn test_tax_fallback_strips_tokens_until_hit() {
        let dir = TempDir::new().unwrap();
        let path = build_store(&dir, "2.0");
        let store = AnnotationStore::open(BackendKind::Serialized, &path).unwrap();

        let entry = store
            .tax_entry("Escherichia coli str. K-12")
            .unwrap()
            .expect("fallback should find the two-token entry");
        assert_eq!(entry.tax_id, "562");

        // Single absent token terminates with a miss, not a loop
        assert!(store.tax_entry("nonexistent").unwrap().is_none());
        assert!(store.tax_entry("").unwrap().is_none());
    }

    #[test]
    fn test_go_lookup_is_exact_and_memoized() {
        let dir = TempDir::new().unwrap();
        let path = build_store(&dir, "2.0");
        let store = AnnotationStore::open(BackendKind::Serialized, &path).unwrap();

        assert!(store.go_entry("GO:00000001").unwrap().is_some());
        // Second lookup served from the memo cache
        assert!(store.go_entry("GO:00000001").unwrap().is_some());
        assert_eq!(store.go_cache.len(), 1);
        // Misses are not cached
        assert!(store.go_entry("GO:11111111").unwrap().is_none());
        assert_eq!(store.go_cache.len(), 1);
    }

    #[test]
    fn test_uniprot_expands_known_go_ids_at_read_time() {
        let dir = TempDir::new().unwrap();
        let path = build_store(&dir, "2.0");
        let store = AnnotationStore::open(BackendKind::Serialized, &path).unwrap();

        let entry = store.uniprot_entry("P04637").unwrap().unwrap();
        // GO:99999999 is absent from the go table and silently dropped
        assert_eq!(entry.go_terms.len(), 1);
        assert_eq!(
            entry.go_terms.iter().next().unwrap().go_id,
            "GO:00000001"
        );
        assert!(store.uniprot_entry("Q00000").unwrap().is_none());
    }

    #[test]
    fn test_incompatible_store_refuses_every_read() {
        let dir = TempDir::new().unwrap();
        let path = build_store(&dir, "1.0");
        let store = AnnotationStore::open(BackendKind::Serialized, &path).unwrap();

        assert!(!store.is_compatible());
        assert_eq!(store.version(), StoreVersion::new(1, 0));
        for result in [
            store.tax_entry("Escherichia coli").map(|_| ()),
            store.go_entry("GO:00000001").map(|_| ()),
            store.uniprot_entry("P04637").map(|_| ()),
            store.counts().map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(TethysError::StoreVersion { found, required, .. })
                    if found == "1.0" && required == "2.0"
            ));
        }
    }

    #[test]
    fn test_missing_store_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.bin");
        assert!(matches!(
            AnnotationStore::open(BackendKind::Serialized, &path),
            Err(TethysError::StoreMissing { .. })
        ));
    }

    #[test]
    fn test_serial_data_default_is_empty() {
        let data = SerialData::default();
        assert!(data.taxonomy.is_empty() && data.go.is_empty() && data.uniprot.is_empty());
    }
}
