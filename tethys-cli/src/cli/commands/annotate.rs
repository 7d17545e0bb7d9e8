use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::path::PathBuf;
use tethys_annot::pipeline::{load_queries, SimilaritySearch};
use tethys_core::{load_config, Config};
use tethys_storage::{AnnotationStore, BackendKind};

#[derive(Args)]
pub struct AnnotateArgs {
    /// Input transcript set (FASTA, optionally gzipped)
    #[arg(short, long, value_name = "FASTA")]
    pub input: PathBuf,

    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Hit table to consolidate; repeatable, processed in given order
    #[arg(short, long = "database", value_name = "TSV")]
    pub databases: Vec<PathBuf>,

    /// Annotation store artifact
    #[arg(long, value_name = "PATH", env = "TETHYS_STORE")]
    pub store_path: PathBuf,

    /// Store backend: relational (SQLite) or serialized (blob)
    #[arg(long, default_value = "relational")]
    pub store_backend: BackendKind,

    /// Output directory override
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// E-value admission cutoff override
    #[arg(long, value_name = "EVALUE")]
    pub evalue: Option<f64>,

    /// Contaminant taxon; repeatable, extends the configured list
    #[arg(long = "contam", value_name = "TAXON")]
    pub contaminants: Vec<String>,

    /// Query organism scientific name override
    #[arg(long, value_name = "NAME")]
    pub organism: Option<String>,
}

pub fn run(args: AnnotateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Cannot load configuration {}", path.display()))?,
        None => Config::default(),
    };

    config.similarity.databases.extend(args.databases);
    if let Some(output) = args.output {
        config.output.directory = output;
    }
    if let Some(evalue) = args.evalue {
        config.similarity.evalue_cutoff = evalue;
    }
    config.taxonomy.contaminants.extend(args.contaminants);
    if args.organism.is_some() {
        config.taxonomy.query_organism = args.organism;
    }

    tracing::info!(
        "Consolidating {} hit tables against {}",
        config.similarity.databases.len(),
        args.store_path.display()
    );

    let store = AnnotationStore::open(args.store_backend, &args.store_path)?;
    let mut records = load_queries(&args.input)?;

    let summary = SimilaritySearch::new(&config, &store, &mut records).run()?;

    println!("{}", "Consolidation complete".green().bold());
    print!("{}", summary);
    println!(
        "Results written to {}",
        config.output.directory.display().to_string().cyan()
    );
    Ok(())
}
