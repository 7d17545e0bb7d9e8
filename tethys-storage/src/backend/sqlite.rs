//! SQLite-backed annotation store encoding

use super::{AnnotationBackend, RawUniprotEntry};
use crate::entry::{GoCategory, GoEntry, TaxEntry};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use tethys_core::{StoreVersion, TethysError, TethysResult};

/// Read-only handle on the relational encoding.
///
/// Tables: `taxonomy(tax_id, lineage, name)`, `go(go_id, term, category,
/// level, level_str)`, `uniprot(uniprot_id, xrefs, comments, kegg,
/// go_csv)`, `version(version_str)`.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open an existing store file. The caller has already checked the
    /// path exists; an unreadable or non-SQLite file fails here.
    pub fn open(path: &Path) -> TethysResult<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| storage_err(path, e))?;
        Ok(Self { conn })
    }

    fn sql_err(&self, e: rusqlite::Error) -> TethysError {
        TethysError::Storage(format!("SQLite query failed: {}", e))
    }
}

fn storage_err(path: &Path, e: rusqlite::Error) -> TethysError {
    TethysError::Storage(format!("Cannot open {} as SQLite: {}", path.display(), e))
}

impl AnnotationBackend for SqliteBackend {
    fn version(&self) -> TethysResult<StoreVersion> {
        let stamp: Option<String> = self
            .conn
            .query_row("SELECT version_str FROM version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| self.sql_err(e))?;

        match stamp {
            Some(s) => s.parse(),
            None => Err(TethysError::Storage(
                "Annotation store has no version row".to_string(),
            )),
        }
    }

    fn tax_entry(&self, name_key: &str) -> TethysResult<Option<TaxEntry>> {
        self.conn
            .query_row(
                "SELECT tax_id, name, lineage FROM taxonomy WHERE name = ?1",
                [name_key],
                |row| {
                    Ok(TaxEntry {
                        tax_id: row.get(0)?,
                        tax_name: row.get(1)?,
                        lineage: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| self.sql_err(e))
    }

    fn go_entry(&self, go_id: &str) -> TethysResult<Option<GoEntry>> {
        let row: Option<(String, String, String, i32)> = self
            .conn
            .query_row(
                "SELECT go_id, term, category, level FROM go WHERE go_id = ?1",
                [go_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()
            .map_err(|e| self.sql_err(e))?;

        row.map(|(go_id, term, category, level)| {
            let category: GoCategory = category
                .parse()
                .map_err(|e: String| TethysError::Storage(e))?;
            Ok(GoEntry {
                go_id,
                term,
                category,
                level,
            })
        })
        .transpose()
    }

    fn uniprot_entry(&self, accession: &str) -> TethysResult<Option<RawUniprotEntry>> {
        self.conn
            .query_row(
                "SELECT uniprot_id, xrefs, comments, kegg, go_csv FROM uniprot \
                 WHERE uniprot_id = ?1",
                [accession],
                |row| {
                    Ok(RawUniprotEntry {
                        uniprot_id: row.get(0)?,
                        database_x_refs: row.get(1)?,
                        comments: row.get(2)?,
                        kegg_terms: row.get(3)?,
                        go_csv: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(|e| self.sql_err(e))
    }

    fn counts(&self) -> TethysResult<(u64, u64, u64)> {
        let count = |table: &str| -> TethysResult<u64> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get::<_, i64>(0)
                })
                .map(|n| n as u64)
                .map_err(|e| self.sql_err(e))
        };
        Ok((count("taxonomy")?, count("go")?, count("uniprot")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::SqliteStoreBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_version_row_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.db");
        // Build a schema but never stamp a version
        let _builder = SqliteStoreBuilder::create(&path).unwrap();

        let backend = SqliteBackend::open(&path).unwrap();
        assert!(matches!(
            backend.version(),
            Err(TethysError::Storage(msg)) if msg.contains("version")
        ));
    }

    #[test]
    fn test_open_garbage_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not_a_db");
        std::fs::write(&path, b"plain text, not sqlite").unwrap();

        let backend = SqliteBackend::open(&path);
        // Open may defer failure to first query depending on SQLite; either way
        // the version read must not succeed.
        match backend {
            Ok(b) => assert!(b.version().is_err()),
            Err(_) => {}
        }
    }
}
