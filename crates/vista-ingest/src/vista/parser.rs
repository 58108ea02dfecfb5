// VISTA Search Results Parser
//
// The search results page embeds one FASTA-like block per enhancer inside a
// <pre> element:
//
//   >Human|chr16:86430087-86430726 | element 1 | positive  | neural tube[12/12] | ...
//   AACTGAAGGGACCCCGTTAGCATAtaaacaaaaggtggggggtagccc...
//
// Header fields are pipe-delimited; the sequence follows the final
// bracketed score once newlines are removed.

use crate::vista::models::EnhancerRecord;
use crate::vista::{IngestError, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use vista_common::types::Region;

const PRE_CLOSE: &str = "</pre";

fn field_delimiter() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(regex) = PATTERN.get() {
        return Ok(regex);
    }
    let regex = Regex::new(r"\s*\|\s*")?;
    Ok(PATTERN.get_or_init(|| regex))
}


// ============================================================================
// Entry Splitter
// ============================================================================

/// Split raw search results into record blocks
///
/// Each block starts at `marker` (e.g., ">Human"). The first marker may sit
/// mid-line right after `<pre>`; every later marker must start a line. The
/// last block is cut at the closing `</pre` tag so trailing HTML never leaks
/// into the final sequence.
pub fn split_entries<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    if marker.is_empty() {
        return Vec::new();
    }

    let mut starts: Vec<usize> = Vec::new();
    for (pos, _) in text.match_indices(marker) {
        if starts.is_empty() || text[..pos].ends_with('\n') {
            starts.push(pos);
        }
    }

    let mut entries = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let mut block = &text[start..end];

        if i + 1 == starts.len() {
            if let Some(cut) = block.find(PRE_CLOSE) {
                block = &block[..cut];
            }
        }

        entries.push(block);
    }

    debug!("Split search results into {} entries", entries.len());
    entries
}

// ============================================================================
// Record Parser
// ============================================================================

pub struct RecordParser;

impl RecordParser {
    /// Parse one record block into an [`EnhancerRecord`]
    ///
    /// Field 0 is the species, field 1 the coordinate, field 2 the element
    /// id. The final field is split at the first `]` closing its tag list
    /// (one not followed by `;`): the tag keeps the
    /// bracket, the remainder is the sequence. Remaining fields containing
    /// a `[` are expression patterns, well-formed or not; the rest are
    /// annotation. Runs of whitespace inside a field collapse to one space.
    pub fn parse(block: &str) -> Result<EnhancerRecord> {
        let cleaned: String = block
            .chars()
            .filter(|c| !matches!(c, '>' | '\n' | '\r'))
            .collect();
        let cleaned = cleaned.trim();

        let fields: Vec<&str> = field_delimiter()?.split(cleaned).collect();
        if fields.len() < 4 {
            return Err(IngestError::Parse(format!(
                "Expected at least 4 fields, found {} in '{}'",
                fields.len(),
                preview(cleaned)
            )));
        }

        let coordinate = fields[1].trim();
        let region: Region = coordinate.parse().map_err(|e| {
            IngestError::Parse(format!("No usable coordinate in '{}': {}", preview(cleaned), e))
        })?;

        let element_id = collapse_whitespace(fields[2]);
        if element_id.is_empty() {
            return Err(IngestError::Parse(format!("Missing element id in '{}'", preview(cleaned))));
        }

        let last = fields[fields.len() - 1];
        let (last_tag, sequence) = Self::split_sequence(last).ok_or_else(|| {
            IngestError::Parse(format!("Final field has no closing bracket: '{}'", preview(last)))
        })?;

        let mut annotations = Vec::new();
        let mut patterns = Vec::new();
        let tags = fields[3..fields.len() - 1]
            .iter()
            .copied()
            .chain(std::iter::once(last_tag));

        for tag in tags.map(collapse_whitespace).filter(|tag| !tag.is_empty()) {
            if tag.contains('[') {
                patterns.push(tag);
            } else {
                annotations.push(tag);
            }
        }

        Ok(EnhancerRecord {
            region,
            coordinate: coordinate.to_string(),
            element_id,
            annotation: annotations.join(";"),
            expression_patterns: patterns.join(";"),
            sequence: sequence.split_whitespace().collect(),
        })
    }

    /// Split `ear[6/6]CTCCCCTgg` into (`ear[6/6]`, `CTCCCCTgg`)
    ///
    /// The split is at the first `]` not followed by `;`, so a compound
    /// `limb[4/5];heart[2/6]` tag stays whole.
    fn split_sequence(field: &str) -> Option<(&str, &str)> {
        field
            .match_indices(']')
            .map(|(idx, _)| idx + 1)
            .find(|&end| !field[end..].trim_start().starts_with(';'))
            .map(|end| field.split_at(end))
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn preview(text: &str) -> String {
    const MAX: usize = 80;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
