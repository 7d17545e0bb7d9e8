//! Reading-frame labels attached to translated queries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reading-frame label reported by the upstream gene predictor.
///
/// A closed set so output routing on the label is exhaustive: a frame
/// string outside this vocabulary is a parse error, not a silent bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingFrame {
    Complete,
    FivePrimePartial,
    ThreePrimePartial,
    Internal,
    /// Frame was assigned upstream but lost during frame selection
    Lost,
}

impl ReadingFrame {
    /// The label as it appears in result rows
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::FivePrimePartial => "5prime_partial",
            Self::ThreePrimePartial => "3prime_partial",
            Self::Internal => "internal",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for ReadingFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReadingFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complete" => Ok(Self::Complete),
            "5prime_partial" | "5'_partial" => Ok(Self::FivePrimePartial),
            "3prime_partial" | "3'_partial" => Ok(Self::ThreePrimePartial),
            "internal" => Ok(Self::Internal),
            "lost" => Ok(Self::Lost),
            _ => Err(format!("Unknown reading frame label: {}", s)),
        }
    }
}
