//! Quote-aware decoder for comma-separated sheet exports
//!
//! The first non-blank line is the header. Every later non-blank line becomes
//! a mapping from column name to the raw (trimmed, unquoted) field text.

use std::collections::BTreeMap;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::warn;

/// Field separator used by the published sheet export
const SEPARATOR: u8 = b',';

/// Quote character around literal fields; stripped from every value
const QUOTE: char = '"';

/// A decoded data row keyed by column name
pub type RawRow = BTreeMap<String, String>;

/// Decodes delimited text into rows keyed by the header's column names
///
/// Returns an empty vector when there is no data row; that is a normal
/// outcome. Rows with missing trailing fields get empty strings, surplus
/// fields are ignored, and rows with unbalanced quotes are dropped.
pub fn decode(text: &str) -> Vec<RawRow> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let Some(headers) = split_fields(header_line) else {
        warn!("catalog header has unbalanced quotes");
        return Vec::new();
    };

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let Some(fields) = split_fields(line) else {
            warn!(row = index + 1, "dropping catalog row with unbalanced quotes");
            continue;
        };

        let row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), fields.get(i).cloned().unwrap_or_default()))
            .collect();
        rows.push(row);
    }

    rows
}

/// Splits one line into trimmed fields, honouring quoted separators
///
/// Each line is read as a record of its own, so a quoted field never spans
/// lines. Any quote character left after parsing is stripped. Returns `None`
/// if the line ends while still inside a quoted region.
fn split_fields(line: &str) -> Option<Vec<String>> {
    if line.matches(QUOTE).count() % 2 != 0 {
        return None;
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(SEPARATOR)
        .trim(Trim::All)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    if !reader.read_record(&mut record).ok()? {
        return None;
    }

    Some(
        record
            .iter()
            .map(|field| field.replace(QUOTE, "").trim().to_string())
            .collect(),
    )
}
