//! Rendering of canonical records for the terminal.
//!
//! # Submodules
//!
//! - [`text`]: the human-readable `simple` and `detailed` layouts
//! - [`json`]: pretty-printed canonical records for scripting
//!
//! Renderers only build strings; printing is left to the binary.

pub mod json;
pub mod text;

use crate::error::NewsError;
use std::fmt;
use std::str::FromStr;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One title line plus a source/date line per item.
    #[default]
    Simple,
    /// Every field, one per line.
    Detailed,
    /// Canonical records as pretty JSON.
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Simple, OutputFormat::Detailed, OutputFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Simple => "simple",
            OutputFormat::Detailed => "detailed",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| {
                NewsError::Configuration(format!(
                    "unknown output format '{s}' (expected simple, detailed or json)"
                ))
            })
    }
}
