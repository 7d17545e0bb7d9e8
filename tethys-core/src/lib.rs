//! Core utilities and types shared across all Tethys crates

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, save_config, Config, OutputConfig, SimilarityConfig, TaxonomyConfig};
pub use error::{TethysError, TethysResult};
pub use types::{ReadingFrame, StoreVersion};

/// Version information for the Tethys project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
