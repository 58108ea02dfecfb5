// VISTA Enhancer Browser Configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://enhancer.lbl.gov/cgi-bin/imagedb3.pl";
pub const DEFAULT_REFERENCE_FASTA: &str = "hg19.fa";
pub const DEFAULT_TISSUE_DIR: &str = "Tissue_specific_files";

/// Organism whose enhancer records are scraped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Species {
    #[default]
    Human,
    Mouse,
}

impl Species {
    /// Name as used by VISTA in record headers and search parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Human => "Human",
            Species::Mouse => "Mouse",
        }
    }

    /// `organism_id` parameter of the element detail page
    pub fn organism_id(&self) -> u32 {
        match self {
            Species::Human => 1,
            Species::Mouse => 2,
        }
    }

    /// Marker that starts every record block (e.g., ">Human")
    pub fn record_marker(&self) -> String {
        format!(">{}", self.as_str())
    }
}

impl std::str::FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "hs" => Ok(Species::Human),
            "mouse" | "mm" => Ok(Species::Mouse),
            _ => Err(format!("Unknown species: {}", s)),
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a VISTA ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VistaConfig {
    /// VISTA CGI endpoint serving both search results and detail pages
    pub base_url: String,

    pub species: Species,

    /// Records per search results page
    pub page_size: u32,

    /// Indexed reference genome FASTA used for strand/sequence lookup
    pub reference_fasta: PathBuf,

    /// Directory receiving the combined file, tissue files and manifest
    pub output_dir: PathBuf,

    /// Combined output file name (None = derived from species)
    pub output_file: Option<String>,

    /// Subdirectory for per-tissue files
    pub tissue_dir_name: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Parse limit for testing (None = parse all)
    pub parse_limit: Option<usize>,

    /// Skip sort/bgzip/tabix of the tissue files
    pub skip_postprocess: bool,
}

impl Default for VistaConfig {
    fn default() -> Self {
        VistaConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            species: Species::Human,
            page_size: 100,
            reference_fasta: PathBuf::from(DEFAULT_REFERENCE_FASTA),
            output_dir: PathBuf::from("."),
            output_file: None,
            tissue_dir_name: DEFAULT_TISSUE_DIR.to_string(),
            timeout_secs: 300,
            parse_limit: None,
            skip_postprocess: false,
        }
    }
}

impl VistaConfig {
    /// Create new config with builder pattern
    pub fn builder() -> VistaConfigBuilder {
        VistaConfigBuilder::default()
    }

    /// URL of the positive-enhancer search results, with sequences included
    pub fn search_url(&self) -> String {
        format!(
            "{}?page=1;show=1;form=ext_search;order=;search.gene=;search.result=yes;\
             search.status=Positives;action=search;search.org={};page_size={};search.sequence=1",
            self.base_url,
            self.species.as_str(),
            self.page_size
        )
    }

    /// URL of the detail page for an element id
    ///
    /// The experiment id is the digits of the element id
    /// ("element 12" -> 12); ids without digits are passed through trimmed.
    pub fn detail_url(&self, element_id: &str) -> String {
        let digits: String = element_id.chars().filter(|c| c.is_ascii_digit()).collect();
        let experiment_id = if digits.is_empty() {
            element_id.trim().to_string()
        } else {
            digits
        };

        format!(
            "{}?form=presentation;show=1;experiment_id={};organism_id={}",
            self.base_url,
            experiment_id,
            self.species.organism_id()
        )
    }

    /// Combined output file name
    /// Example: species = Human -> VISTA_Human_enhancers_sequences.bed
    pub fn output_file_name(&self) -> String {
        self.output_file
            .clone()
            .unwrap_or_else(|| format!("VISTA_{}_enhancers_sequences.bed", self.species.as_str()))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.output_dir.join(self.output_file_name())
    }

    pub fn tissue_dir(&self) -> PathBuf {
        self.output_dir.join(&self.tissue_dir_name)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join("manifest.json")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!("Base URL must be http(s): {}", self.base_url));
        }

        if self.page_size == 0 {
            return Err("Page size must be greater than 0".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.tissue_dir_name.is_empty() {
            return Err("Tissue directory name cannot be empty".to_string());
        }

        if let Some(name) = &self.output_file {
            if name.is_empty() || name.contains('/') {
                return Err(format!("Invalid output file name: '{}'", name));
            }
        }

        Ok(())
    }
}

/// Builder for VistaConfig
#[derive(Debug, Default)]
pub struct VistaConfigBuilder {
    base_url: Option<String>,
    species: Option<Species>,
    page_size: Option<u32>,
    reference_fasta: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    output_file: Option<String>,
    tissue_dir_name: Option<String>,
    timeout_secs: Option<u64>,
    parse_limit: Option<usize>,
    skip_postprocess: bool,
}

impl VistaConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn species(mut self, species: Species) -> Self {
        self.species = Some(species);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn reference_fasta(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_fasta = Some(path.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = Some(name.into());
        self
    }

    pub fn tissue_dir_name(mut self, name: impl Into<String>) -> Self {
        self.tissue_dir_name = Some(name.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn parse_limit(mut self, limit: usize) -> Self {
        self.parse_limit = Some(limit);
        self
    }

    pub fn skip_postprocess(mut self, skip: bool) -> Self {
        self.skip_postprocess = skip;
        self
    }

    pub fn build(self) -> VistaConfig {
        let default = VistaConfig::default();

        VistaConfig {
            base_url: self.base_url.unwrap_or(default.base_url),
            species: self.species.unwrap_or(default.species),
            page_size: self.page_size.unwrap_or(default.page_size),
            reference_fasta: self.reference_fasta.unwrap_or(default.reference_fasta),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
            output_file: self.output_file,
            tissue_dir_name: self.tissue_dir_name.unwrap_or(default.tissue_dir_name),
            timeout_secs: self.timeout_secs.unwrap_or(default.timeout_secs),
            parse_limit: self.parse_limit,
            skip_postprocess: self.skip_postprocess,
        }
    }
}

// ============================================================================
// Environment Variable Support
// ============================================================================

impl VistaConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = VistaConfig::default();

        VistaConfig {
            base_url: std::env::var("VISTA_BASE_URL").unwrap_or(default.base_url),
            species: std::env::var("VISTA_SPECIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.species),
            page_size: std::env::var("VISTA_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.page_size),
            reference_fasta: std::env::var("VISTA_REFERENCE_FASTA")
                .map(PathBuf::from)
                .unwrap_or(default.reference_fasta),
            output_dir: std::env::var("VISTA_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.output_dir),
            output_file: std::env::var("VISTA_OUTPUT_FILE").ok(),
            tissue_dir_name: std::env::var("VISTA_TISSUE_DIR").unwrap_or(default.tissue_dir_name),
            timeout_secs: std::env::var("VISTA_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
            parse_limit: std::env::var("VISTA_PARSE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok()),
            skip_postprocess: std::env::var("VISTA_SKIP_POSTPROCESS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
