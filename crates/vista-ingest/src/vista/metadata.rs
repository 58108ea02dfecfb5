//! Element detail page scraping
//!
//! The detail page lays out experiment metadata as label/value table cells:
//!
//! ```html
//! <tr><td>Position:</td><td>chr16:78510608-78511944</td></tr>
//! <tr><td>Flanking genes:</td><td><a href="...">WWOX</a>-<a href="...">MAF</a></td></tr>
//! ```
//!
//! A label may also share its cell with the value (`<td>Position: chr1:...</td>`).

use crate::vista::models::ExperimentMetadata;
use crate::vista::{IngestError, Result};
use scraper::{ElementRef, Html, Selector};

pub const POSITION_LABEL: &str = "Position:";
pub const FLANKING_GENES_LABEL: &str = "Flanking genes:";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| IngestError::Parse(format!("Invalid selector '{}': {}", css, e)))
}

/// Extract position and flanking genes from a detail page
///
/// Returns `None` when either label is missing; callers treat that as
/// "unknown", never as an empty gene list. The position is the first
/// whitespace-delimited token after its label.
pub fn parse_experiment_page(html: &str) -> Result<Option<ExperimentMetadata>> {
    let document = Html::parse_document(html);
    let rows = selector("tr")?;
    let cells = selector("td, th")?;
    let anchors = selector("a")?;

    let mut position = None;
    let mut flanking_genes = None;

    for row in document.select(&rows) {
        let row_cells: Vec<ElementRef> = row.select(&cells).collect();

        if position.is_none() {
            if let Some((_, value)) = labelled_value(&row_cells, POSITION_LABEL) {
                position = value.split_whitespace().next().map(str::to_string);
            }
        }

        if flanking_genes.is_none() {
            if let Some((cell, _)) = labelled_value(&row_cells, FLANKING_GENES_LABEL) {
                let genes: Vec<String> = cell
                    .select(&anchors)
                    .map(|anchor| collapse_whitespace(&anchor.text().collect::<String>()))
                    .filter(|gene| !gene.is_empty())
                    .collect();
                flanking_genes = Some(genes);
            }
        }
    }

    Ok(match (position, flanking_genes) {
        (Some(position), Some(flanking_genes)) => Some(ExperimentMetadata {
            position,
            flanking_genes,
        }),
        _ => None,
    })
}

/// Find the cell holding the value for `label` in one table row
///
/// Returns the value cell and its text with the label removed. The value is
/// the label cell's own remainder when non-empty, otherwise the next cell.
fn labelled_value<'a>(cells: &[ElementRef<'a>], label: &str) -> Option<(ElementRef<'a>, String)> {
    for (i, cell) in cells.iter().enumerate() {
        let text = collapse_whitespace(&cell.text().collect::<String>());
        let Some(remainder) = text.strip_prefix(label) else {
            continue;
        };

        let remainder = remainder.trim();
        if !remainder.is_empty() {
            return Some((*cell, remainder.to_string()));
        }

        return cells.get(i + 1).map(|next| {
            let value = collapse_whitespace(&next.text().collect::<String>());
            (*next, value)
        });
    }

    None
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"
<html><body>
<table>
  <tr><td><b>Element:</b></td><td>element 12</td></tr>
  <tr><td><b>Position:</b></td><td>chr16:78510608-78511944   (hg19)</td></tr>
  <tr><td><b>Flanking genes:</b></td>
      <td><a href="/gene?WWOX">WWOX</a> - <a href="/gene?MAF"> MAF </a></td></tr>
</table>
</body></html>
"#;

    #[test]
    fn test_parse_experiment_page() {
        let metadata = parse_experiment_page(DETAIL_PAGE).unwrap().unwrap();
        assert_eq!(metadata.position, "chr16:78510608-78511944");
        assert_eq!(metadata.flanking_genes, vec!["WWOX", "MAF"]);
        assert_eq!(metadata.genes_column(), "WWOX,MAF");
    }

    #[test]
    fn test_parse_inline_label() {
        let html = r#"<table>
            <tr><td>Position: chr2:10-20</td></tr>
            <tr><td>Flanking genes: <a>SHH</a></td></tr>
        </table>"#;
        let metadata = parse_experiment_page(html).unwrap().unwrap();
        assert_eq!(metadata.position, "chr2:10-20");
        assert_eq!(metadata.flanking_genes, vec!["SHH"]);
    }

    #[test]
    fn test_flanking_label_without_genes() {
        let html = r#"<table>
            <tr><td>Position:</td><td>chr2:10-20</td></tr>
            <tr><td>Flanking genes:</td><td>none reported</td></tr>
        </table>"#;
        let metadata = parse_experiment_page(html).unwrap().unwrap();
        assert!(metadata.flanking_genes.is_empty());
        assert_eq!(metadata.genes_column(), "none");
    }

    #[test]
    fn test_missing_label_is_unknown() {
        let no_genes = r#"<table><tr><td>Position:</td><td>chr2:10-20</td></tr></table>"#;
        assert!(parse_experiment_page(no_genes).unwrap().is_none());

        let no_position =
            r#"<table><tr><td>Flanking genes:</td><td><a>SHH</a></td></tr></table>"#;
        assert!(parse_experiment_page(no_position).unwrap().is_none());

        assert!(parse_experiment_page("<html><body>Not found</body></html>")
            .unwrap()
            .is_none());
    }
}
