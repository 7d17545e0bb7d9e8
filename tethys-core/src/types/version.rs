//! Annotation store version stamps

use crate::TethysError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A MAJOR.MINOR annotation store version stamp.
///
/// Stores are only readable when their stamp equals the version this
/// release requires, on both components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreVersion {
    pub major: u16,
    pub minor: u16,
}

impl StoreVersion {
    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Check compatibility against the version a release requires
    pub fn is_compatible(&self, required: &StoreVersion) -> bool {
        self == required
    }
}

impl fmt::Display for StoreVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for StoreVersion {
    type Err = TethysError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(|| invalid(s))?;
        let minor = parts
            .next()
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(|| invalid(s))?;
        if parts.next().is_some() {
            return Err(invalid(s));
        }
        Ok(Self { major, minor })
    }
}

fn invalid(s: &str) -> TethysError {
    TethysError::Parse(format!(
        "Invalid store version '{}': expected MAJOR.MINOR",
        s
    ))
}
