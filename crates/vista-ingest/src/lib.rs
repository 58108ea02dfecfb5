//! VISTA Ingest Library
//!
//! Scrapes the positive enhancer records of the VISTA Enhancer Browser and
//! turns them into BED files: one combined file with a row per tissue
//! expression pattern, plus one sorted, bgzip-compressed and tabix-indexed
//! file per tissue category.
//!
//! # Example
//!
//! ```no_run
//! use vista_ingest::vista::{SamtoolsToolkit, VistaConfig, VistaPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = VistaConfig::builder()
//!         .output_dir("./data/vista")
//!         .reference_fasta("./data/hg19.fa")
//!         .build();
//!
//!     let pipeline = VistaPipeline::new(config, SamtoolsToolkit::default())?;
//!     let stats = pipeline.run().await?;
//!     println!("{} rows written", stats.rows_written);
//!     Ok(())
//! }
//! ```

pub mod vista;
