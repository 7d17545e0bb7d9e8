//! Construction of store artifacts in either encoding.
//!
//! Bulk scraping of the upstream NCBI/GO/UniProt dumps is not this
//! crate's business; these builders take already-shaped rows and produce
//! a versioned artifact. Tests and small operator workflows build stores
//! through this API.

pub mod go_table;
pub mod lineage;
pub mod taxonomy_dump;
pub mod uniprot_dat;

pub use go_table::parse_go_table;
pub use lineage::{assemble_lineage, TaxonomyNode};
pub use taxonomy_dump::parse_taxonomy_dump;
pub use uniprot_dat::parse_uniprot_dat;

use crate::backend::{RawUniprotEntry, SerialData};
use crate::entry::{GoEntry, TaxEntry, UNKNOWN_GO_LEVEL};
use rusqlite::{params, Connection};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tethys_core::{StoreVersion, TethysError, TethysResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS taxonomy (
    tax_id  TEXT NOT NULL,
    lineage TEXT NOT NULL,
    name    TEXT PRIMARY KEY
);
CREATE TABLE IF NOT EXISTS go (
    go_id     TEXT PRIMARY KEY,
    term      TEXT NOT NULL,
    category  TEXT NOT NULL,
    level     INTEGER NOT NULL,
    level_str TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS uniprot (
    uniprot_id TEXT PRIMARY KEY,
    xrefs      TEXT NOT NULL,
    comments   TEXT NOT NULL,
    kegg       TEXT NOT NULL,
    go_csv     TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS version (
    version_str TEXT NOT NULL
);
";

fn level_str(level: i32) -> String {
    if level == UNKNOWN_GO_LEVEL {
        "unknown".to_string()
    } else {
        level.to_string()
    }
}

/// Builds the relational encoding
pub struct SqliteStoreBuilder {
    conn: Connection,
}

impl SqliteStoreBuilder {
    pub fn create(path: &Path) -> TethysResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| TethysError::Storage(format!("Cannot create {}: {}", path.display(), e)))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| TethysError::Storage(format!("Schema creation failed: {}", e)))?;
        Ok(Self { conn })
    }

    pub fn add_taxon(&mut self, entry: TaxEntry) -> TethysResult<()> {
        let name = entry.tax_name.to_lowercase();
        self.conn
            .execute(
                "INSERT OR REPLACE INTO taxonomy (tax_id, lineage, name) VALUES (?1, ?2, ?3)",
                params![entry.tax_id, entry.lineage, name],
            )
            .map_err(insert_err)?;
        Ok(())
    }

    pub fn add_go(&mut self, entry: GoEntry) -> TethysResult<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO go (go_id, term, category, level, level_str) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.go_id,
                    entry.term,
                    entry.category.as_str(),
                    entry.level,
                    level_str(entry.level)
                ],
            )
            .map_err(insert_err)?;
        Ok(())
    }

    pub fn add_uniprot(&mut self, entry: RawUniprotEntry) -> TethysResult<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO uniprot (uniprot_id, xrefs, comments, kegg, go_csv) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.uniprot_id,
                    entry.database_x_refs,
                    entry.comments,
                    entry.kegg_terms,
                    entry.go_csv
                ],
            )
            .map_err(insert_err)?;
        Ok(())
    }

    /// Stamp the version and close. The stamp is written last so a
    /// half-built artifact never looks readable.
    pub fn finish(self, version: &StoreVersion) -> TethysResult<()> {
        self.conn
            .execute("DELETE FROM version", [])
            .map_err(insert_err)?;
        self.conn
            .execute(
                "INSERT INTO version (version_str) VALUES (?1)",
                params![version.to_string()],
            )
            .map_err(insert_err)?;
        Ok(())
    }
}

fn insert_err(e: rusqlite::Error) -> TethysError {
    TethysError::Storage(format!("SQLite write failed: {}", e))
}

/// Builds the serialized encoding
#[derive(Default)]
pub struct SerialStoreBuilder {
    data: SerialData,
}

impl SerialStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_taxon(&mut self, mut entry: TaxEntry) {
        entry.tax_name = entry.tax_name.to_lowercase();
        self.data.taxonomy.insert(entry.tax_name.clone(), entry);
    }

    pub fn add_go(&mut self, entry: GoEntry) {
        self.data.go.insert(entry.go_id.clone(), entry);
    }

    pub fn add_uniprot(&mut self, entry: RawUniprotEntry) {
        self.data.uniprot.insert(entry.uniprot_id.clone(), entry);
    }

    pub fn finish(mut self, path: &Path, version: &StoreVersion) -> TethysResult<()> {
        self.data.version = version.to_string();
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), &self.data).map_err(|e| {
            TethysError::Serialization(format!(
                "Cannot serialize annotation store {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }
}
