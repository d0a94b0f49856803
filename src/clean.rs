//! Normalization of scraped text into typed fields.

use crate::record::{AggregateTable, Field};

/// Marker the activity site renders for free listings
const FREE_MARKER: &str = "gratis";

/// Parse a price rendered in Spanish locale, e.g. `"1.234,56 €"`.
///
/// Free markers parse to `0.0`. Returns `None` for text that is not a price
/// at all.
pub fn parse_locale_price(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.to_lowercase().contains(FREE_MARKER) {
        return Some(0.0);
    }

    let numeric: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if numeric.is_empty() {
        return None;
    }

    // '.' groups thousands, ',' marks decimals
    numeric.replace('.', "").replace(',', ".").parse().ok()
}

/// Convert a text price column to numeric in place.
///
/// Cells that fail to parse become [`Field::Absent`] rather than poisoning
/// the column; already-numeric and absent cells pass through untouched.
pub fn clean_prices(table: &mut AggregateTable, column: &str) {
    for row in table.rows_mut() {
        let Some(field) = row.get_mut(column) else {
            continue;
        };
        if let Field::Text(text) = field {
            *field = match parse_locale_price(text) {
                Some(price) => Field::Float(price),
                None => {
                    tracing::debug!(cell = %text, column, "unparseable price, dropping cell");
                    Field::Absent
                }
            };
        }
    }
}
