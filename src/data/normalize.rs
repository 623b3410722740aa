//! Coerces decoded sheet rows into typed product records

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{ProductRecord, RawRow};

/// Coerces one decoded row into a `ProductRecord`
///
/// Returns `None` unless the row has a positive `id` and a non-empty `name`;
/// that gate applies to every source format.
pub fn normalize(row: &RawRow) -> Option<ProductRecord> {
    let mut record = ProductRecord {
        id: 0,
        name: String::new(),
        category: String::new(),
        price: 0,
        description: String::new(),
        image_url: String::new(),
        stock: 0,
        featured: false,
        popularity: 0,
        extra: Default::default(),
    };

    for (column, raw) in row {
        let value = raw.trim();
        match column.as_str() {
            "id" => record.id = parse_unsigned(value),
            "price" => record.price = parse_unsigned(value),
            "stock" => record.stock = parse_unsigned(value),
            "popularity" => record.popularity = parse_unsigned(value),
            "isFeatured" | "featured" => record.featured = value.eq_ignore_ascii_case("true"),
            "image" | "imageUrl" => record.image_url = value.to_string(),
            "name" => record.name = value.to_string(),
            "category" => record.category = value.to_string(),
            "description" => record.description = value.to_string(),
            _ => {
                record.extra.insert(column.clone(), value.to_string());
            }
        }
    }

    if record.id == 0 || record.name.is_empty() {
        debug!(id = record.id, "rejecting catalog row without id or name");
        return None;
    }
    Some(record)
}

/// Normalizes a batch of rows, discarding every rejected one
///
/// Ids are unique in the result: the first row with a given id wins and
/// later duplicates are dropped.
pub fn normalize_rows(rows: &[RawRow]) -> Vec<ProductRecord> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(normalize)
        .filter(|record| {
            let first = seen.insert(record.id);
            if !first {
                warn!(id = record.id, name = %record.name, "dropping catalog row with duplicate id");
            }
            first
        })
        .collect()
}

/// Parses the leading integer of `value`; negatives and garbage become 0
///
/// Mirrors lenient spreadsheet number parsing: `"1000.50"` is 1000 and
/// `"12abc"` is 12.
fn parse_integer(value: &str) -> i64 {
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let Ok(magnitude) = digits[..end].parse::<i64>() else {
        return 0;
    };

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn parse_unsigned(value: &str) -> u64 {
    u64::try_from(parse_integer(value)).unwrap_or(0)
}
