// VISTA Enhancer Pipeline Orchestration
//
// 1. Download the search results page
// 2. Split it into record blocks
// 3. Parse, expand and annotate each record (strand, flanking genes)
// 4. Write the combined BED file
// 5. Partition by tissue, then sort/bgzip/tabix each tissue file
// 6. Write the run manifest
//
// Records are processed one at a time. Malformed record text is skipped;
// network, tool and I/O failures abort the run.

use crate::vista::expression::expand_patterns;
use crate::vista::manifest::{RunManifest, TissueManifestEntry};
use crate::vista::models::OutputRow;
use crate::vista::parser::{split_entries, RecordParser};
use crate::vista::strand::resolve_strand;
use crate::vista::tools::GenomicTools;
use crate::vista::writer::{partition_by_tissue, read_rows, tissue_categories, write_combined};
use crate::vista::{Result, VistaClient, VistaConfig};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Record blocks found in the search results
    pub entries_found: usize,

    pub records_parsed: usize,

    /// Blocks skipped because their text could not be parsed
    pub records_skipped: usize,

    /// Rows in the combined BED file
    pub rows_written: usize,

    pub tissue_files: usize,
}

/// VISTA enhancer ingestion pipeline
pub struct VistaPipeline<T: GenomicTools> {
    config: VistaConfig,
    client: VistaClient,
    tools: T,
}

impl<T: GenomicTools> VistaPipeline<T> {
    pub fn new(config: VistaConfig, tools: T) -> Result<Self> {
        let client = VistaClient::new(config.clone())?;
        Ok(Self {
            config,
            client,
            tools,
        })
    }

    pub fn config(&self) -> &VistaConfig {
        &self.config
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Run the full pipeline: scrape, write, partition, post-process
    pub async fn run(&self) -> Result<PipelineStats> {
        info!(species = %self.config.species, "Starting VISTA enhancer ingestion");
        std::fs::create_dir_all(&self.config.output_dir)?;

        info!("Step 1/4: Downloading search results...");
        let text = self.client.fetch_search_results().await?;

        info!("Step 2/4: Parsing and annotating records...");
        let mut stats = PipelineStats::default();
        let rows = self.collect_rows(&text, &mut stats).await?;

        info!("Step 3/4: Writing combined BED file...");
        let combined = self.config.combined_path();
        stats.rows_written = write_combined(&combined, &rows)?;

        info!("Step 4/4: Partitioning by tissue...");
        self.finalize(&combined, stats).await
    }

    /// Partition an existing combined file and post-process the tissue files
    ///
    /// Used on its own to rebuild the tissue files without network access.
    pub async fn repartition(&self, combined: &Path) -> Result<PipelineStats> {
        let rows = read_rows(combined)?;
        let stats = PipelineStats {
            rows_written: rows.len(),
            ..PipelineStats::default()
        };
        self.finalize(combined, stats).await
    }

    /// Parse every record block and expand it into output rows
    async fn collect_rows(&self, text: &str, stats: &mut PipelineStats) -> Result<Vec<OutputRow>> {
        let marker = self.config.species.record_marker();
        let entries = split_entries(text, &marker);
        stats.entries_found = entries.len();
        info!("Found {} {} entries", entries.len(), marker);

        let mut rows = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            if let Some(max_entries) = self.config.parse_limit {
                if index >= max_entries {
                    info!("Reached parse limit of {} entries", max_entries);
                    break;
                }
            }

            match self.process_entry(entry).await? {
                Some(entry_rows) => {
                    stats.records_parsed += 1;
                    rows.extend(entry_rows);
                },
                None => stats.records_skipped += 1,
            }
        }

        let categories = tissue_categories(&rows);
        info!(
            records = stats.records_parsed,
            skipped = stats.records_skipped,
            rows = rows.len(),
            tissues = categories.len(),
            "Processed enhancer records"
        );

        Ok(rows)
    }

    /// Turn one record block into its output rows
    ///
    /// Returns `Ok(None)` when the block's text is malformed; errors from
    /// the network or external tools are propagated.
    pub async fn process_entry(&self, entry: &str) -> Result<Option<Vec<OutputRow>>> {
        let record = match RecordParser::parse(entry) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping record: {}", e);
                return Ok(None);
            },
        };

        let patterns = match expand_patterns(&record.expression_patterns) {
            Ok(patterns) => patterns,
            Err(e) => {
                warn!(element = %record.element_id, "Skipping record: {}", e);
                return Ok(None);
            },
        };

        if patterns.is_empty() {
            debug!(element = %record.element_id, "Record has no expression patterns");
        }

        let metadata = self.client.fetch_experiment_metadata(&record.element_id).await?;
        let strand = resolve_strand(
            &self.tools,
            &self.config.reference_fasta,
            &record,
            metadata.as_ref(),
        )
        .await?;

        debug!(
            element = %record.element_id,
            region = %record.region,
            strand = %strand,
            patterns = patterns.len(),
            "Annotated record"
        );

        Ok(Some(
            patterns
                .iter()
                .map(|pattern| OutputRow::new(&record, pattern, strand, metadata.as_ref()))
                .collect(),
        ))
    }

    /// Partition, post-process and record the manifest
    async fn finalize(&self, combined: &Path, mut stats: PipelineStats) -> Result<PipelineStats> {
        let tissue_dir = self.config.tissue_dir();
        let tissue_files = partition_by_tissue(combined, &tissue_dir)?;
        stats.tissue_files = tissue_files.len();

        let mut entries = Vec::with_capacity(tissue_files.len());
        for file in &tissue_files {
            let artifact = if self.config.skip_postprocess {
                file.path.clone()
            } else {
                self.tools.sort_file(&file.path).await?;
                let compressed = self.tools.compress_file(&file.path).await?;
                self.tools.index_file(&compressed).await?;
                debug!(category = %file.category, path = %compressed.display(), "Compressed and indexed");
                compressed
            };

            entries.push(TissueManifestEntry::from_artifact(
                &file.category,
                &artifact,
                file.rows,
            )?);
        }

        let manifest = RunManifest {
            generated_at: Utc::now(),
            source_url: self.config.search_url(),
            species: self.config.species.to_string(),
            combined_file: combined
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            stats: stats.clone(),
            tissues: entries,
        };
        manifest.write(&self.config.manifest_path())?;

        info!(
            "Output has been written to '{}'; tissue specific files are in '{}'",
            combined.display(),
            tissue_dir.display()
        );

        Ok(stats)
    }
}
