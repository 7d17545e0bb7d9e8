//! Configuration types for Tethys

use crate::TethysError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Rows with an e-value above this are rejected before selection
    #[serde(default = "default_evalue_cutoff")]
    pub evalue_cutoff: f64,
    /// Hit tables to consolidate, processed in this order
    #[serde(default)]
    pub databases: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Scientific name of the organism the queries came from
    #[serde(default)]
    pub query_organism: Option<String>,
    /// Taxa whose lineages mark a hit as contamination
    #[serde(default)]
    pub contaminants: Vec<String>,
    /// Title terms that mark a hit description as uninformative
    #[serde(default = "default_uninformative_terms")]
    pub uninformative_terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    /// Also emit FASTA beside each TSV result set
    #[serde(default = "default_write_fasta")]
    pub write_fasta: bool,
}

// Default value functions
fn default_evalue_cutoff() -> f64 {
    1e-5
}
fn default_uninformative_terms() -> Vec<String> {
    [
        "conserved",
        "predicted",
        "unknown",
        "unnamed",
        "hypothetical",
        "putative",
        "unidentified",
        "uncharacterized",
        "uncultured",
        "uninformative",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_output_directory() -> PathBuf {
    PathBuf::from("tethys_out")
}
fn default_write_fasta() -> bool {
    true
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            evalue_cutoff: default_evalue_cutoff(),
            databases: Vec::new(),
        }
    }
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            query_organism: None,
            contaminants: Vec::new(),
            uninformative_terms: default_uninformative_terms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            write_fasta: default_write_fasta(),
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, TethysError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| TethysError::Configuration(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), TethysError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| TethysError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
