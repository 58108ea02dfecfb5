//! Genomic types used across the VISTA workspace

use crate::error::{Result, VistaError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// `chrN:start-end`, chromosome restricted to `chr[0-9XYM]+`
#[allow(clippy::unwrap_used)]
fn region_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(chr[0-9XYM]+):(\d+)-(\d+)$").unwrap())
}

// ============================================================================
// Region
// ============================================================================

/// A genomic interval as written in samtools region syntax
/// (e.g., `chr16:78510608-78511944`).
///
/// Coordinates are kept exactly as they appear in the source text; no
/// 0-based/1-based conversion is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// Chromosome name (e.g., "chr16")
    pub chrom: String,

    /// Start coordinate
    pub start: u64,

    /// End coordinate, always greater than `start`
    pub end: u64,
}

impl Region {
    /// Create a region, rejecting empty or inverted intervals
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        let chrom = chrom.into();
        if start >= end {
            return Err(VistaError::InvalidRegion(format!(
                "{}:{}-{} (start must be less than end)",
                chrom, start, end
            )));
        }
        Ok(Self { chrom, start, end })
    }
}

impl std::str::FromStr for Region {
    type Err = VistaError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let captures = region_pattern()
            .captures(trimmed)
            .ok_or_else(|| VistaError::InvalidRegion(trimmed.to_string()))?;

        let start = captures[2]
            .parse::<u64>()
            .map_err(|e| VistaError::InvalidRegion(format!("{}: {}", trimmed, e)))?;
        let end = captures[3]
            .parse::<u64>()
            .map_err(|e| VistaError::InvalidRegion(format!("{}: {}", trimmed, e)))?;

        Region::new(&captures[1], start, end)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

// ============================================================================
// Strand
// ============================================================================

/// DNA strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
        }
    }
}

impl std::str::FromStr for Strand {
    type Err = VistaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            other => Err(VistaError::InvalidStrand(other.to_string())),
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
