// Strand Validation / Orientation Reconciliation
//
// The strand written for a record is not the one samtools reports for the
// record's coordinate. It is re-derived from the element detail page: the
// page's position is looked up in the reference, and the record is `+` only
// when that reference sequence equals the record's sequence
// (case-insensitive) and the page's position equals the record's
// coordinate. Every other outcome, including a page without metadata, is `-`.

use crate::vista::models::{EnhancerRecord, ExperimentMetadata};
use crate::vista::tools::GenomicTools;
use crate::vista::Result;
use std::path::Path;
use tracing::{debug, warn};
use vista_common::types::{Region, Strand};

/// Strand from the sequence and coordinate gates
pub fn reconcile_strand(
    record_coordinate: &str,
    record_sequence: &str,
    position: &str,
    reference_sequence: &str,
) -> Strand {
    let sequences_match = reference_sequence.eq_ignore_ascii_case(record_sequence);
    let coordinates_match = position == record_coordinate;

    if sequences_match && coordinates_match {
        Strand::Plus
    } else {
        Strand::Minus
    }
}

/// Resolve the strand written for `record`
///
/// The record's own coordinate is always looked up first; a lookup failure
/// is fatal. The reported strand is then superseded by
/// [`reconcile_strand`] over the detail page position.
pub async fn resolve_strand<T: GenomicTools + ?Sized>(
    tools: &T,
    reference: &Path,
    record: &EnhancerRecord,
    metadata: Option<&ExperimentMetadata>,
) -> Result<Strand> {
    let coordinate = record.coordinate();
    let reported = tools.lookup_region(reference, coordinate).await?;
    debug!(
        element = %record.element_id,
        region = %coordinate,
        reported = %reported.strand,
        "Looked up record region"
    );

    let Some(metadata) = metadata else {
        debug!(element = %record.element_id, "No detail page metadata, strand set to -");
        return Ok(Strand::Minus);
    };

    if metadata.position.parse::<Region>().is_err() {
        warn!(
            element = %record.element_id,
            position = %metadata.position,
            "Detail page position is not a region, strand set to -"
        );
        return Ok(Strand::Minus);
    }

    let reference_lookup = tools.lookup_region(reference, &metadata.position).await?;

    Ok(reconcile_strand(
        coordinate,
        &record.sequence,
        &metadata.position,
        &reference_lookup.sequence,
    ))
}
