//! Run manifest written next to the produced files

use crate::vista::pipeline::PipelineStats;
use crate::vista::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use vista_common::checksum::sha256_file;

/// Summary of one ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub generated_at: DateTime<Utc>,

    /// Search results URL the records were scraped from
    pub source_url: String,

    pub species: String,

    /// Combined BED file name
    pub combined_file: String,

    pub stats: PipelineStats,

    pub tissues: Vec<TissueManifestEntry>,
}

/// Final artifact of one tissue category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TissueManifestEntry {
    pub category: String,

    /// File name relative to the tissue directory
    pub file: String,

    pub rows: usize,

    /// SHA-256 of the final artifact (compressed when post-processed)
    pub sha256: String,
}

impl TissueManifestEntry {
    /// Describe an artifact on disk, hashing its contents
    pub fn from_artifact(category: &str, artifact: &Path, rows: usize) -> Result<Self> {
        let file = artifact
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(TissueManifestEntry {
            category: category.to_string(),
            file,
            rows,
            sha256: sha256_file(artifact)?,
        })
    }
}

impl RunManifest {
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        info!(path = %path.display(), tissues = self.tissues.len(), "Run manifest saved");
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
