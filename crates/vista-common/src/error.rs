//! Error types shared across the VISTA workspace

use thiserror::Error;

/// Result type alias for shared VISTA operations
pub type Result<T> = std::result::Result<T, VistaError>;

/// Main error type for shared VISTA utilities
#[derive(Error, Debug)]
pub enum VistaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid genomic region: {0}")]
    InvalidRegion(String),

    #[error("Invalid strand: {0}")]
    InvalidStrand(String),
}
