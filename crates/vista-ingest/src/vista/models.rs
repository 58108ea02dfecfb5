// VISTA Enhancer Data Models

use crate::vista::expression::{is_valid_category, normalize_label};
use crate::vista::{IngestError, Result};
use serde::{Deserialize, Serialize};
use vista_common::types::{Region, Strand};

/// Column header of the combined and per-tissue BED files
pub const BED_HEADER: [&str; 10] = [
    "#chrom",
    "chromStart",
    "chromEnd",
    "name",
    "score",
    "strand",
    "annotation",
    "sequence",
    "expressionPattern",
    "Flanking_genes",
];

/// Placeholder for an empty text column
pub const EMPTY_FIELD: &str = ".";

/// Flanking genes column when the detail page had no usable metadata
pub const UNKNOWN_GENES: &str = "unknown";

/// Flanking genes column when the page lists the label but no genes
pub const NO_GENES: &str = "none";

// ============================================================================
// Enhancer Record
// ============================================================================

/// One enhancer record parsed from the search results text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancerRecord {
    /// Genomic interval (e.g., chr16:78510608-78511944)
    pub region: Region,

    /// Coordinate text exactly as written in the record
    pub coordinate: String,

    /// Element identifier (e.g., "element 12")
    pub element_id: String,

    /// Non-pattern fields joined with `;` (e.g., "positive")
    pub annotation: String,

    /// Expression pattern fields joined with `;`
    /// (e.g., "limb[4/5];heart[2/6]")
    pub expression_patterns: String,

    /// Nucleotide sequence following the final bracketed tag
    pub sequence: String,
}

impl EnhancerRecord {
    pub fn chromosome(&self) -> &str {
        &self.region.chrom
    }

    pub fn start(&self) -> u64 {
        self.region.start
    }

    pub fn end(&self) -> u64 {
        self.region.end
    }

    /// Coordinate string as it appeared in the record
    pub fn coordinate(&self) -> &str {
        &self.coordinate
    }
}

// ============================================================================
// Expression Pattern
// ============================================================================

/// One `<label>[<num>/<den>]` component of a record's expression patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionPatternEntry {
    /// Canonical tissue category (e.g., "Hindbrain_rhombencephalon")
    pub tissue_label: String,

    /// Component as written in the source (e.g., "hindbrain (rhombencephalon)[4/6]")
    pub raw_label: String,

    pub numerator: u32,

    pub denominator: u32,
}

impl ExpressionPatternEntry {
    /// Create an entry, enforcing `0 <= numerator <= denominator`, `denominator > 0`
    /// and a normalized label usable as a tissue file name
    pub fn new(raw_label: impl Into<String>, numerator: u32, denominator: u32) -> Result<Self> {
        let raw_label = raw_label.into();

        if denominator == 0 {
            return Err(IngestError::Parse(format!("Zero denominator in '{}'", raw_label)));
        }

        if numerator > denominator {
            return Err(IngestError::Parse(format!(
                "Numerator exceeds denominator in '{}'",
                raw_label
            )));
        }

        let tissue_label = normalize_label(&raw_label);
        if !is_valid_category(&tissue_label) {
            return Err(IngestError::Parse(format!(
                "Unusable tissue category '{}' from '{}'",
                tissue_label, raw_label
            )));
        }

        Ok(ExpressionPatternEntry {
            tissue_label,
            raw_label,
            numerator,
            denominator,
        })
    }

    /// Reproducibility ratio formatted with two decimals (3/5 -> "0.60")
    pub fn score(&self) -> String {
        format!("{:.2}", f64::from(self.numerator) / f64::from(self.denominator))
    }
}

// ============================================================================
// Experiment Metadata
// ============================================================================

/// Metadata scraped from an element detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    /// Text following the "Position:" label
    pub position: String,

    /// Anchor texts following the "Flanking genes:" label
    pub flanking_genes: Vec<String>,
}

impl ExperimentMetadata {
    /// Flanking genes as written to the BED column
    pub fn genes_column(&self) -> String {
        if self.flanking_genes.is_empty() {
            NO_GENES.to_string()
        } else {
            self.flanking_genes.join(",")
        }
    }
}

// ============================================================================
// Output Row
// ============================================================================

/// One BED row: an enhancer record paired with one expression pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub name: String,
    pub score: String,
    pub strand: Strand,
    pub annotation: String,
    pub sequence: String,
    pub expression_pattern: String,
    pub flanking_genes: String,
}

impl OutputRow {
    pub fn new(
        record: &EnhancerRecord,
        pattern: &ExpressionPatternEntry,
        strand: Strand,
        metadata: Option<&ExperimentMetadata>,
    ) -> Self {
        OutputRow {
            chrom: record.chromosome().to_string(),
            start: record.start(),
            end: record.end(),
            name: record.element_id.clone(),
            score: pattern.score(),
            strand,
            annotation: non_empty_or_placeholder(&record.annotation),
            sequence: non_empty_or_placeholder(&record.sequence),
            expression_pattern: pattern.raw_label.clone(),
            flanking_genes: metadata
                .map(ExperimentMetadata::genes_column)
                .unwrap_or_else(|| UNKNOWN_GENES.to_string()),
        }
    }

    /// Tissue category recomputed from the expression pattern column
    pub fn tissue_category(&self) -> String {
        normalize_label(&self.expression_pattern)
    }

    /// Column values in header order
    pub fn to_fields(&self) -> [String; 10] {
        [
            self.chrom.clone(),
            self.start.to_string(),
            self.end.to_string(),
            self.name.clone(),
            self.score.clone(),
            self.strand.to_string(),
            self.annotation.clone(),
            self.sequence.clone(),
            self.expression_pattern.clone(),
            self.flanking_genes.clone(),
        ]
    }

    /// Rebuild a row from BED columns
    pub fn from_fields(fields: &[&str]) -> Result<Self> {
        if fields.len() != BED_HEADER.len() {
            return Err(IngestError::Parse(format!(
                "Expected {} columns, found {}",
                BED_HEADER.len(),
                fields.len()
            )));
        }

        let parse_coordinate = |value: &str, column: &str| {
            value
                .parse::<u64>()
                .map_err(|e| IngestError::Parse(format!("Invalid {} '{}': {}", column, value, e)))
        };

        Ok(OutputRow {
            chrom: fields[0].to_string(),
            start: parse_coordinate(fields[1], "chromStart")?,
            end: parse_coordinate(fields[2], "chromEnd")?,
            name: fields[3].to_string(),
            score: fields[4].to_string(),
            strand: fields[5].parse()?,
            annotation: fields[6].to_string(),
            sequence: fields[7].to_string(),
            expression_pattern: fields[8].to_string(),
            flanking_genes: fields[9].to_string(),
        })
    }
}

fn non_empty_or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        EMPTY_FIELD.to_string()
    } else {
        value.to_string()
    }
}
