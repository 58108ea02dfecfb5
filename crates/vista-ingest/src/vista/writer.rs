// BED Writer and Tissue Partitioner

use crate::vista::expression::is_valid_category;
use crate::vista::models::{OutputRow, BED_HEADER};
use crate::vista::{IngestError, Result};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Tab-separated writer emitting the BED header followed by rows
pub struct BedWriter<W: Write> {
    inner: csv::Writer<W>,
    rows_written: usize,
}

impl BedWriter<File> {
    /// Create (or truncate) a BED file and write its header
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::new(File::create(path)?)
    }
}

impl<W: Write> BedWriter<W> {
    pub fn new(writer: W) -> Result<Self> {
        let mut inner = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .has_headers(false)
            .from_writer(writer);

        inner.write_record(BED_HEADER)?;

        Ok(BedWriter {
            inner,
            rows_written: 0,
        })
    }

    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.inner.write_record(row.to_fields())?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and return the number of rows written
    pub fn finish(mut self) -> Result<usize> {
        self.inner.flush()?;
        Ok(self.rows_written)
    }
}

/// Write all rows, in order, to a combined BED file
pub fn write_combined(path: &Path, rows: &[OutputRow]) -> Result<usize> {
    let mut writer = BedWriter::create(path)?;
    for row in rows {
        writer.write_row(row)?;
    }
    let written = writer.finish()?;

    info!(path = %path.display(), rows = written, "Wrote combined BED file");
    Ok(written)
}

/// Read every data row of a BED file written by [`BedWriter`]
pub fn read_rows(path: &Path) -> Result<Vec<OutputRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .comment(Some(b'#'))
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields: Vec<&str> = record.iter().collect();
        rows.push(OutputRow::from_fields(&fields)?);
    }

    debug!(path = %path.display(), rows = rows.len(), "Read BED rows");
    Ok(rows)
}

/// Distinct normalized tissue categories across all rows
pub fn tissue_categories(rows: &[OutputRow]) -> BTreeSet<String> {
    rows.iter().map(OutputRow::tissue_category).collect()
}

/// One per-tissue output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TissueFile {
    /// Normalized tissue category (e.g., "Limb")
    pub category: String,

    /// Path of the plain BED file
    pub path: PathBuf,

    pub rows: usize,
}

/// Partition a combined BED file into one file per tissue category
///
/// The combined file is read once; rows are bucketed by the category
/// recomputed from their expression pattern column and each bucket is
/// written to `<tissue_dir>/<Category>.<combined file name>` with the
/// combined header. Rows keep their combined-file order within a bucket.
pub fn partition_by_tissue(combined: &Path, tissue_dir: &Path) -> Result<Vec<TissueFile>> {
    let rows = read_rows(combined)?;
    let base_name = combined
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "enhancers.bed".to_string());

    let mut buckets: BTreeMap<String, Vec<&OutputRow>> = BTreeMap::new();
    for row in &rows {
        let category = row.tissue_category();
        if !is_valid_category(&category) {
            return Err(IngestError::Validation(format!(
                "Row '{}' has unusable tissue category '{}'",
                row.name, category
            )));
        }
        buckets.entry(category).or_default().push(row);
    }

    std::fs::create_dir_all(tissue_dir)?;

    let mut files = Vec::with_capacity(buckets.len());
    for (category, bucket) in buckets {
        let path = tissue_dir.join(format!("{}.{}", category, base_name));
        let mut writer = BedWriter::create(&path)?;
        for row in &bucket {
            writer.write_row(row)?;
        }
        let written = writer.finish()?;

        debug!(category = %category, rows = written, "Wrote tissue file");
        files.push(TissueFile {
            category,
            path,
            rows: written,
        });
    }

    info!(
        tissues = files.len(),
        dir = %tissue_dir.display(),
        "Partitioned {} rows by tissue",
        rows.len()
    );

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_common::types::Strand;

    fn row(chrom: &str, start: u64, pattern: &str) -> OutputRow {
        OutputRow {
            chrom: chrom.to_string(),
            start,
            end: start + 100,
            name: format!("element {}", start),
            score: "0.50".to_string(),
            strand: Strand::Plus,
            annotation: "positive".to_string(),
            sequence: "ACGT".to_string(),
            expression_pattern: pattern.to_string(),
            flanking_genes: "SHH".to_string(),
        }
    }

    fn header_line() -> String {
        BED_HEADER.join("\t")
    }

    #[test]
    fn test_bed_writer_header_and_rows() {
        let mut writer = BedWriter::new(Vec::new()).unwrap();
        writer.write_row(&row("chr1", 10, "limb[1/2]")).unwrap();
        assert_eq!(writer.rows_written(), 1);

        let bytes = writer.inner.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "#chrom\tchromStart\tchromEnd\tname\tscore\tstrand\tannotation\tsequence\texpressionPattern\tFlanking_genes"
        );
        assert_eq!(
            lines[1],
            "chr1\t10\t110\telement 10\t0.50\t+\tpositive\tACGT\tlimb[1/2]\tSHH"
        );
    }

    #[test]
    fn test_write_and_read_combined_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.bed");
        let rows = vec![
            row("chr2", 5, "heart[1/2]"),
            row("chr1", 9, "hindbrain (rhombencephalon)[2/2]"),
        ];

        assert_eq!(write_combined(&path, &rows).unwrap(), 2);
        assert_eq!(read_rows(&path).unwrap(), rows);
    }

    #[test]
    fn test_tissue_categories_are_deduplicated() {
        let rows = vec![
            row("chr1", 1, "limb[1/2]"),
            row("chr1", 2, "Limb[2/2]"),
            row("chr1", 3, "neural tube[1/3]"),
        ];
        let categories: Vec<String> = tissue_categories(&rows).into_iter().collect();
        assert_eq!(categories, vec!["Limb", "Neural_tube"]);
    }

    #[test]
    fn test_partition_by_tissue() {
        let dir = tempfile::tempdir().unwrap();
        let combined = dir.path().join("VISTA_Human_enhancers_sequences.bed");
        let rows = vec![
            row("chr1", 1, "limb[1/2]"),
            row("chr1", 2, "heart[1/2]"),
            row("chr3", 3, "limb[2/2]"),
        ];
        write_combined(&combined, &rows).unwrap();

        let tissue_dir = dir.path().join("Tissue_specific_files");
        let files = partition_by_tissue(&combined, &tissue_dir).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].category, "Heart");
        assert_eq!(files[1].category, "Limb");
        assert_eq!(files[1].rows, 2);
        assert_eq!(
            files[1].path,
            tissue_dir.join("Limb.VISTA_Human_enhancers_sequences.bed")
        );

        let combined_text = std::fs::read_to_string(&combined).unwrap();
        let combined_lines: BTreeSet<&str> = combined_text.lines().collect();
        for file in &files {
            let text = std::fs::read_to_string(&file.path).unwrap();
            let mut lines = text.lines();
            assert_eq!(lines.next().unwrap(), header_line());
            for line in lines {
                assert!(combined_lines.contains(line));
                let fields: Vec<&str> = line.split('\t').collect();
                let parsed = OutputRow::from_fields(&fields).unwrap();
                assert_eq!(parsed.tissue_category(), file.category);
            }
        }
    }

    #[test]
    fn test_partition_rejects_path_like_category() {
        let dir = tempfile::tempdir().unwrap();
        let combined = dir.path().join("combined.bed");
        write_combined(&combined, &[row("chr1", 1, "../../escape[1/2]")]).unwrap();

        let tissue_dir = dir.path().join("t").join("u");
        let err = partition_by_tissue(&combined, &tissue_dir).unwrap_err();
        assert!(matches!(err, IngestError::Validation(_)));
        assert!(!dir.path().join("escape.combined.bed").exists());
    }

    #[test]
    fn test_partition_empty_combined_file() {
        let dir = tempfile::tempdir().unwrap();
        let combined = dir.path().join("combined.bed");
        write_combined(&combined, &[]).unwrap();

        let files = partition_by_tissue(&combined, &dir.path().join("tissues")).unwrap();
        assert!(files.is_empty());
    }
}
