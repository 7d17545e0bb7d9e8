pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tethys",
    version,
    about = "Consolidate alignment hit tables into one best-supported annotation per transcript",
    long_about = "Tethys reduces per-database alignment hit tables to a single best hit per \
                  query sequence, flags likely contaminants by taxonomic lineage, and enriches \
                  surviving sequences with taxonomy, GO, and UniProt metadata from a versioned \
                  annotation store."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run similarity-search consolidation over one or more hit tables
    Annotate(commands::annotate::AnnotateArgs),

    /// Build or inspect an annotation store
    Store {
        #[command(subcommand)]
        command: commands::store::StoreCommands,
    },
}
