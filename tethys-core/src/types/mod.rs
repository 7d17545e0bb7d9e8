//! Shared types used across Tethys crates

mod frame;
mod version;

pub use frame::ReadingFrame;
pub use version::StoreVersion;
