//! External genomic tools
//!
//! Sequence lookup, sorting, block compression and indexing are delegated to
//! the standard command-line tools (`samtools`, `sort`, `bgzip`, `tabix`).
//! [`GenomicTools`] abstracts them so the transform logic can be exercised
//! without the binaries installed.

use crate::vista::{IngestError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::debug;
use vista_common::types::Strand;

/// Result of a strand-marked region lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLookup {
    /// Region as echoed in the FASTA header (without the strand suffix)
    pub region: String,

    /// Strand reported in the header's parenthesized token
    pub strand: Strand,

    /// Reference sequence, lines concatenated
    pub sequence: String,
}

/// Capability over the external genomic command-line tools
#[async_trait]
pub trait GenomicTools: Send + Sync {
    /// Look up `region` in an indexed reference FASTA with strand marking
    async fn lookup_region(&self, reference: &Path, region: &str) -> Result<RegionLookup>;

    /// Sort a BED file in place by chromosome (byte order), start, end
    async fn sort_file(&self, path: &Path) -> Result<()>;

    /// Block-compress a file, replacing it with `<path>.gz`
    async fn compress_file(&self, path: &Path) -> Result<PathBuf>;

    /// Build a positional index for a compressed BED file
    async fn index_file(&self, path: &Path) -> Result<PathBuf>;
}

fn header_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(regex) = PATTERN.get() {
        return Ok(regex);
    }
    let regex = Regex::new(r"^>(?P<region>[^(\s]+)\((?P<strand>.*?)\)")?;
    Ok(PATTERN.get_or_init(|| regex))
}

/// Parse `samtools faidx --mark-strand sign` output
///
/// ```text
/// >chr16:78510608-78511944(+)
/// ACGTACGT...
/// ```
pub fn parse_faidx_output(output: &str) -> Result<RegionLookup> {
    let mut lines = output.lines();
    let header = lines
        .next()
        .map(str::trim)
        .filter(|line| line.starts_with('>'))
        .ok_or_else(|| IngestError::Parse("Lookup output has no FASTA header".to_string()))?;

    let captures = header_pattern()?
        .captures(header)
        .ok_or_else(|| IngestError::Parse(format!("Lookup header has no strand mark: '{}'", header)))?;

    let strand: Strand = captures["strand"].parse()?;
    let sequence: String = lines.map(str::trim).collect();

    Ok(RegionLookup {
        region: captures["region"].to_string(),
        strand,
        sequence,
    })
}

/// Process-backed [`GenomicTools`] using samtools, coreutils sort, bgzip and tabix
#[derive(Debug, Clone)]
pub struct SamtoolsToolkit {
    pub samtools: String,
    pub sort: String,
    pub bgzip: String,
    pub tabix: String,
}

impl Default for SamtoolsToolkit {
    fn default() -> Self {
        SamtoolsToolkit {
            samtools: "samtools".to_string(),
            sort: "sort".to_string(),
            bgzip: "bgzip".to_string(),
            tabix: "tabix".to_string(),
        }
    }
}

impl SamtoolsToolkit {
    /// Run a command to completion, failing on spawn errors or non-zero exit
    async fn run(tool: &str, command: &mut Command) -> Result<Output> {
        debug!(tool, command = ?command.as_std(), "Running external tool");

        let output = command.output().await.map_err(|e| IngestError::Tool {
            tool: tool.to_string(),
            detail: format!("could not start: {}", e),
        })?;

        if !output.status.success() {
            return Err(IngestError::Tool {
                tool: tool.to_string(),
                detail: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl GenomicTools for SamtoolsToolkit {
    async fn lookup_region(&self, reference: &Path, region: &str) -> Result<RegionLookup> {
        let output = Self::run(
            "samtools faidx",
            Command::new(&self.samtools)
                .arg("faidx")
                .arg(reference)
                .arg(region)
                .args(["--mark-strand", "sign"]),
        )
        .await?;

        parse_faidx_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn sort_file(&self, path: &Path) -> Result<()> {
        Self::run(
            "sort",
            Command::new(&self.sort)
                .env("LC_ALL", "C")
                .args(["-k1,1", "-k2,2n", "-k3,3n"])
                .arg(path)
                .arg("-o")
                .arg(path),
        )
        .await?;
        Ok(())
    }

    async fn compress_file(&self, path: &Path) -> Result<PathBuf> {
        Self::run("bgzip", Command::new(&self.bgzip).arg("-f").arg(path)).await?;
        Ok(with_suffix(path, "gz"))
    }

    async fn index_file(&self, path: &Path) -> Result<PathBuf> {
        Self::run(
            "tabix",
            Command::new(&self.tabix).args(["-f", "-p", "bed"]).arg(path),
        )
        .await?;
        Ok(with_suffix(path, "tbi"))
    }
}

/// Append an extension to a path (`a.bed` -> `a.bed.gz`)
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
