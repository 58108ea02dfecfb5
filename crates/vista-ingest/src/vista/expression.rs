// Expression Pattern Expander
//
// A record's expression patterns field is a `;`-separated list of
// `<label>[<num>/<den>]` components. Each component becomes one output row.

use crate::vista::models::ExpressionPatternEntry;
use crate::vista::{IngestError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn component_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(regex) = PATTERN.get() {
        return Ok(regex);
    }
    let regex = Regex::new(r"^(?P<label>.*?)\s*\[\s*(?P<num>\d+)\s*/\s*(?P<den>\d+)\s*\]$")?;
    Ok(PATTERN.get_or_init(|| regex))
}

/// Canonical tissue category key for a pattern label
///
/// Takes the text before the first `[`, trims it, replaces whitespace with
/// `_`, drops commas and parentheses, then capitalizes (first character
/// upper, the rest lower):
/// `"trigeminal V (ganglion, cranial)[3/5]"` -> `"Trigeminal_v_ganglion_cranial"`.
///
/// Idempotent: normalizing a normalized label returns it unchanged.
pub fn normalize_label(raw: &str) -> String {
    let base = raw.split('[').next().unwrap_or_default().trim();

    let underscored: String = base
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    capitalize(&underscored)
}

/// First character upper, the rest lower (ASCII case mapping only)
fn capitalize(text: &str) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| if i == 0 { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
        .collect()
}

/// Whether a normalized label can name a tissue file inside the tissue directory
///
/// Rejects empty labels, path separators and a leading `.` (hidden files, `..`).
pub fn is_valid_category(category: &str) -> bool {
    !category.is_empty()
        && !category.starts_with('.')
        && !category.contains(['/', '\\', '\0'])
}

/// Parse one `<label>[<num>/<den>]` component
pub fn parse_component(component: &str) -> Result<ExpressionPatternEntry> {
    let component = component.trim();
    let captures = component_pattern()?
        .captures(component)
        .ok_or_else(|| IngestError::Parse(format!("Malformed expression pattern '{}'", component)))?;

    if captures["label"].trim().is_empty() {
        return Err(IngestError::Parse(format!(
            "Expression pattern without a label '{}'",
            component
        )));
    }

    let numerator: u32 = captures["num"]
        .parse()
        .map_err(|e| IngestError::Parse(format!("Invalid numerator in '{}': {}", component, e)))?;
    let denominator: u32 = captures["den"]
        .parse()
        .map_err(|e| IngestError::Parse(format!("Invalid denominator in '{}': {}", component, e)))?;

    ExpressionPatternEntry::new(component, numerator, denominator)
}

/// Fan a `;`-separated patterns field out into one entry per component
///
/// Empty components (e.g., a trailing `;`) are ignored. Any malformed
/// component fails the whole field.
pub fn expand_patterns(patterns: &str) -> Result<Vec<ExpressionPatternEntry>> {
    patterns
        .split(';')
        .map(str::trim)
        .filter(|component| !component.is_empty())
        .map(parse_component)
        .collect()
}
