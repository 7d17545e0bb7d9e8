use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tethys_storage::build::{
    parse_go_table, parse_taxonomy_dump, parse_uniprot_dat, SerialStoreBuilder, SqliteStoreBuilder,
};
use tethys_storage::{AnnotationStore, BackendKind, REQUIRED_STORE_VERSION};

#[derive(Subcommand)]
pub enum StoreCommands {
    /// Report version, compatibility, and table sizes
    Info(InfoArgs),

    /// Build a store artifact from taxonomy, GO, and UniProt inputs
    Build(BuildArgs),
}

pub fn run(command: StoreCommands) -> Result<()> {
    match command {
        StoreCommands::Info(args) => info(args),
        StoreCommands::Build(args) => build(args),
    }
}

#[derive(Args)]
pub struct InfoArgs {
    /// Annotation store artifact
    #[arg(long, value_name = "PATH", env = "TETHYS_STORE")]
    pub path: PathBuf,

    /// Store backend: relational (SQLite) or serialized (blob)
    #[arg(long, default_value = "relational")]
    pub backend: BackendKind,
}

fn info(args: InfoArgs) -> Result<()> {
    let store = AnnotationStore::open(args.backend, &args.path)?;

    println!("Annotation store: {}", args.path.display());
    println!("Backend:          {}", args.backend);
    println!("Version:          {}", store.version());
    println!("Required:         {}", REQUIRED_STORE_VERSION);

    if store.is_compatible() {
        println!("Status:           {}", "compatible".green());
        let counts = store.counts()?;
        println!("Taxonomy entries: {}", counts.taxonomy);
        println!("GO entries:       {}", counts.go);
        println!("UniProt entries:  {}", counts.uniprot);
    } else {
        println!("Status:           {}", "incompatible".red().bold());
        println!("All reads will be refused; re-download the annotation store.");
    }
    Ok(())
}

#[derive(Args)]
pub struct BuildArgs {
    /// Path of the artifact to create
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Store backend: relational (SQLite) or serialized (blob)
    #[arg(long, default_value = "relational")]
    pub backend: BackendKind,

    /// Taxonomy dump: tax_id <TAB> parent_id <TAB> name
    #[arg(long, value_name = "TSV")]
    pub taxonomy: Option<PathBuf>,

    /// GO term table: go_id <TAB> term <TAB> category <TAB> level
    #[arg(long, value_name = "TSV")]
    pub go: Option<PathBuf>,

    /// UniProt flat file (ID/DR/CC tagged records)
    #[arg(long, value_name = "DAT")]
    pub uniprot: Option<PathBuf>,
}

fn open_input(path: &Path, what: &str) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Cannot open {} {}", what, path.display()))?;
    Ok(BufReader::new(file))
}

fn build(args: BuildArgs) -> Result<()> {
    if args.taxonomy.is_none() && args.go.is_none() && args.uniprot.is_none() {
        anyhow::bail!("Nothing to build: give at least one of --taxonomy, --go, --uniprot");
    }

    let taxa = match &args.taxonomy {
        Some(path) => parse_taxonomy_dump(open_input(path, "taxonomy dump")?)?,
        None => Vec::new(),
    };
    let go_terms = match &args.go {
        Some(path) => parse_go_table(open_input(path, "GO table")?)?,
        None => Vec::new(),
    };
    let uniprot_rows = match &args.uniprot {
        Some(path) => parse_uniprot_dat(open_input(path, "UniProt flat file")?)?,
        None => Vec::new(),
    };
    let (n_taxa, n_go, n_uniprot) = (taxa.len(), go_terms.len(), uniprot_rows.len());

    match args.backend {
        BackendKind::Relational => {
            let mut builder = SqliteStoreBuilder::create(&args.output)?;
            for entry in taxa {
                builder.add_taxon(entry)?;
            }
            for entry in go_terms {
                builder.add_go(entry)?;
            }
            for entry in uniprot_rows {
                builder.add_uniprot(entry)?;
            }
            builder.finish(&REQUIRED_STORE_VERSION)?;
        }
        BackendKind::Serialized => {
            let mut builder = SerialStoreBuilder::new();
            for entry in taxa {
                builder.add_taxon(entry);
            }
            for entry in go_terms {
                builder.add_go(entry);
            }
            for entry in uniprot_rows {
                builder.add_uniprot(entry);
            }
            builder.finish(&args.output, &REQUIRED_STORE_VERSION)?;
        }
    }

    println!("{}", "Store built".green().bold());
    println!("Artifact:         {}", args.output.display());
    println!("Backend:          {}", args.backend);
    println!("Version:          {}", REQUIRED_STORE_VERSION);
    println!("Taxonomy entries: {}", n_taxa);
    println!("GO entries:       {}", n_go);
    println!("UniProt entries:  {}", n_uniprot);
    Ok(())
}
