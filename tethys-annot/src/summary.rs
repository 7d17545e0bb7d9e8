//! Run statistics for the consolidation stage

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tethys_core::TethysResult;

/// Counts for one database's reduction
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatabaseSummary {
    pub database: PathBuf,
    pub rows: usize,
    pub rejected_by_evalue: usize,
    pub winners: usize,
    pub contaminants: usize,
    pub informative: usize,
    pub unselected: usize,
    /// Rows whose query id was absent from the loaded input set
    pub unknown_queries: usize,
}

/// Counts for the whole run, written beside the result sets
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub databases: Vec<DatabaseSummary>,
    pub total_queries: usize,
    pub queries_with_hit: usize,
    pub overall_contaminants: usize,
    pub no_hit_queries: usize,
}

impl RunSummary {
    pub fn new(total_queries: usize) -> Self {
        Self {
            started_at: Utc::now(),
            databases: Vec::new(),
            total_queries,
            queries_with_hit: 0,
            overall_contaminants: 0,
            no_hit_queries: 0,
        }
    }

    pub fn write_json(&self, path: &Path) -> TethysResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} queries, {} with a best hit, {} contaminant, {} no-hit",
            self.total_queries, self.queries_with_hit, self.overall_contaminants, self.no_hit_queries
        )?;
        for db in &self.databases {
            writeln!(
                f,
                "  {}: {} rows, {} rejected, {} winners ({} contaminant)",
                db.database.display(),
                db.rows,
                db.rejected_by_evalue,
                db.winners,
                db.contaminants
            )?;
        }
        Ok(())
    }
}
