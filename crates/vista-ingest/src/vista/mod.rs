// VISTA Enhancer Browser Ingestion Module
//
// This module scrapes enhancer records from the VISTA Enhancer Browser
// (https://enhancer.lbl.gov/) and turns them into BED-like interval files,
// one combined file plus one file per tissue expression pattern.
//
// Stages:
// - Download: HTTP client for the search results and element detail pages
// - Parse: record splitter/parser and expression pattern expander
// - Resolve: strand and reference sequence via samtools, metadata via HTML
// - Write: combined BED file, tissue partitioning, sort/bgzip/tabix
// - Pipeline: orchestration workflow and run manifest
//
// Data sources:
// - Search results: https://enhancer.lbl.gov/cgi-bin/imagedb3.pl?...form=ext_search...
// - Element detail: https://enhancer.lbl.gov/cgi-bin/imagedb3.pl?form=presentation;...

pub mod config;
pub mod downloader;
pub mod expression;
pub mod manifest;
pub mod metadata;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod strand;
pub mod tools;
pub mod writer;

// Re-export main types
pub use config::{Species, VistaConfig};
pub use downloader::VistaClient;
pub use expression::{expand_patterns, normalize_label};
pub use manifest::{RunManifest, TissueManifestEntry};
pub use models::{EnhancerRecord, ExperimentMetadata, ExpressionPatternEntry, OutputRow};
pub use parser::{split_entries, RecordParser};
pub use pipeline::{PipelineStats, VistaPipeline};
pub use tools::{GenomicTools, RegionLookup, SamtoolsToolkit};
pub use writer::{partition_by_tissue, tissue_categories, BedWriter, TissueFile};

/// Result type for VISTA ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error types for VISTA ingestion
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Download error: {0}")]
    Download(#[from] reqwest::Error),

    #[error("HTTP error {status} fetching {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("BED I/O error: {0}")]
    Bed(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] vista_common::VistaError),

    #[error("{tool} failed: {detail}")]
    Tool { tool: String, detail: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<regex::Error> for IngestError {
    fn from(err: regex::Error) -> Self {
        IngestError::Parse(err.to_string())
    }
}
