//! Serialized-blob annotation store encoding

use super::{AnnotationBackend, RawUniprotEntry};
use crate::entry::{GoEntry, TaxEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tethys_core::{StoreVersion, TethysError, TethysResult};

/// The maps persisted inside the blob, keyed exactly like the relational
/// tables: taxonomy by lower-cased name, GO by id, UniProt by accession.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerialData {
    pub version: String,
    pub taxonomy: HashMap<String, TaxEntry>,
    pub go: HashMap<String, GoEntry>,
    pub uniprot: HashMap<String, RawUniprotEntry>,
}

/// In-memory handle over a deserialized [`SerialData`] blob
pub struct SerialBackend {
    data: SerialData,
}

impl SerialBackend {
    /// Load and deserialize a blob. A file that does not decode as
    /// [`SerialData`] fails here.
    pub fn open(path: &Path) -> TethysResult<Self> {
        let file = File::open(path)?;
        let data: SerialData = bincode::deserialize_from(BufReader::new(file)).map_err(|e| {
            TethysError::Serialization(format!(
                "Cannot deserialize annotation store {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self { data })
    }

    pub fn from_data(data: SerialData) -> Self {
        Self { data }
    }
}

impl AnnotationBackend for SerialBackend {
    fn version(&self) -> TethysResult<StoreVersion> {
        self.data.version.parse()
    }

    fn tax_entry(&self, name_key: &str) -> TethysResult<Option<TaxEntry>> {
        Ok(self.data.taxonomy.get(name_key).cloned())
    }

    fn go_entry(&self, go_id: &str) -> TethysResult<Option<GoEntry>> {
        Ok(self.data.go.get(go_id).cloned())
    }

    fn uniprot_entry(&self, accession: &str) -> TethysResult<Option<RawUniprotEntry>> {
        Ok(self.data.uniprot.get(accession).cloned())
    }

    fn counts(&self) -> TethysResult<(u64, u64, u64)> {
        Ok((
            self.data.taxonomy.len() as u64,
            self.data.go.len() as u64,
            self.data.uniprot.len() as u64,
        ))
    }
}
