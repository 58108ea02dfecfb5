//! VISTA Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared genomic types, utilities, and error handling for the VISTA ingest
//! workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`VistaError`] and the crate [`Result`] alias
//! - **Types**: genomic [`Region`](types::Region) and [`Strand`](types::Strand)
//! - **Checksums**: SHA-256 digests of produced artifacts
//! - **Logging**: `tracing` subscriber setup shared by all binaries
//!
//! # Example
//!
//! ```no_run
//! use vista_common::types::Region;
//!
//! fn main() -> vista_common::Result<()> {
//!     let region: Region = "chr16:78510608-78511944".parse()?;
//!     assert_eq!(region.chrom, "chr16");
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VistaError};
