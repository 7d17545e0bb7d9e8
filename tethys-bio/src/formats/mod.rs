pub mod fasta;

pub use fasta::{read_fasta, write_fasta, FastaRecord};
