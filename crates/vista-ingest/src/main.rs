//! VISTA Ingest - enhancer scraping tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use vista_common::logging::{init_logging, LogConfig, LogLevel};
use vista_ingest::vista::{PipelineStats, SamtoolsToolkit, Species, VistaConfig, VistaPipeline};

#[derive(Parser, Debug)]
#[command(name = "vista-ingest")]
#[command(author, version, about = "VISTA enhancer ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape VISTA and write the combined and tissue specific BED files
    Run {
        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Indexed reference genome FASTA
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Species to scrape (human, mouse)
        #[arg(short, long)]
        species: Option<Species>,

        /// Only process the first N records
        #[arg(short, long)]
        limit: Option<usize>,

        /// Skip sort/bgzip/tabix of the tissue files
        #[arg(long)]
        skip_postprocess: bool,
    },

    /// Re-partition an existing combined BED file by tissue
    Partition {
        /// Combined BED file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip sort/bgzip/tabix of the tissue files
        #[arg(long)]
        skip_postprocess: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_config = log_config(cli.verbose)?;
    let _guard = init_logging(&log_config)?;

    let result = match cli.command {
        Command::Run {
            output_dir,
            reference,
            species,
            limit,
            skip_postprocess,
        } => {
            let mut config = VistaConfig::from_env();
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(reference) = reference {
                config.reference_fasta = reference;
            }
            if let Some(species) = species {
                config.species = species;
            }
            if limit.is_some() {
                config.parse_limit = limit;
            }
            config.skip_postprocess |= skip_postprocess;

            run(config).await
        },
        Command::Partition {
            input,
            output_dir,
            skip_postprocess,
        } => {
            let mut config = VistaConfig::from_env();
            config.output_dir = output_dir
                .or_else(|| input.parent().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            config.skip_postprocess |= skip_postprocess;

            partition(config, input).await
        },
    };

    match result {
        Ok(stats) => {
            info!(
                records = stats.records_parsed,
                skipped = stats.records_skipped,
                rows = stats.rows_written,
                tissues = stats.tissue_files,
                "Ingestion complete"
            );
            Ok(())
        },
        Err(e) => {
            error!("Ingestion failed: {:#}", e);
            Err(e)
        },
    }
}

/// `LOG_*` variables apply first; `--verbose` then overrides the level
fn log_config(verbose: bool) -> Result<LogConfig> {
    let mut config = LogConfig::builder()
        .log_file_prefix("vista-ingest")
        .build()
        .merge_env()?;

    if verbose {
        config.level = LogLevel::Debug;
    }

    Ok(config)
}

async fn run(config: VistaConfig) -> Result<PipelineStats> {
    let pipeline = VistaPipeline::new(config, SamtoolsToolkit::default())
        .context("Invalid VISTA configuration")?;
    Ok(pipeline.run().await?)
}

async fn partition(config: VistaConfig, input: PathBuf) -> Result<PipelineStats> {
    info!(input = %input.display(), "Re-partitioning combined file");
    let pipeline = VistaPipeline::new(config, SamtoolsToolkit::default())
        .context("Invalid VISTA configuration")?;
    Ok(pipeline.repartition(&input).await?)
}
