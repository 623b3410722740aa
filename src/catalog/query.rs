//! Pure filters over a catalog's records

use crate::data::ProductRecord;

/// How the storefront narrows the product list
///
/// A category and a free-text query are alternative modes; choosing one
/// replaces the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every product
    #[default]
    All,
    /// Products in one category
    Category(String),
    /// Products matching a case-insensitive substring
    Search(String),
}

impl Selection {
    /// Applies the selection to `records`
    pub fn apply<'a>(&self, records: &'a [ProductRecord]) -> Vec<&'a ProductRecord> {
        match self {
            Selection::All => records.iter().collect(),
            Selection::Category(category) => filter(records, Some(category.as_str()), None),
            Selection::Search(query) => filter(records, None, Some(query.as_str())),
        }
    }
}

/// Records whose category equals `category` exactly
pub fn filter_by_category<'a>(records: &'a [ProductRecord], category: &str) -> Vec<&'a ProductRecord> {
    records.iter().filter(|r| r.category == category).collect()
}

/// Records whose name, description or category contains `query`, ignoring case
pub fn search<'a>(records: &'a [ProductRecord], query: &str) -> Vec<&'a ProductRecord> {
    let query = query.to_lowercase();
    records.iter().filter(|r| matches_query(r, &query)).collect()
}

/// Category filter first, then search, skipping whichever is absent
pub fn filter<'a>(
    records: &'a [ProductRecord],
    category: Option<&str>,
    query: Option<&str>,
) -> Vec<&'a ProductRecord> {
    let query = query.map(str::to_lowercase);
    records
        .iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .filter(|r| query.as_deref().map_or(true, |q| matches_query(r, q)))
        .collect()
}

pub fn by_id(records: &[ProductRecord], id: u64) -> Option<&ProductRecord> {
    records.iter().find(|r| r.id == id)
}

pub fn featured(records: &[ProductRecord]) -> Vec<&ProductRecord> {
    records.iter().filter(|r| r.featured).collect()
}

/// Distinct non-empty categories in order of first appearance
pub fn categories(records: &[ProductRecord]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for record in records {
        let category = record.category.as_str();
        if !category.is_empty() && !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

/// `query` must already be lowercased
fn matches_query(record: &ProductRecord, query: &str) -> bool {
    [&record.name, &record.description, &record.category]
        .iter()
        .any(|field| field.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str, category: &str, description: &str, featured: bool) -> ProductRecord {
        ProductRecord {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price: 1000 * id,
            description: description.to_string(),
            image_url: String::new(),
            stock: 1,
            featured,
            popularity: 0,
            extra: Default::default(),
        }
    }

    fn sample() -> Vec<ProductRecord> {
        vec![
            record(1, "USB-C Cable", "Cables", "Braided, 1m", true),
            record(2, "Wireless Charger", "Chargers", "Fast pad", false),
            record(3, "HDMI Cable", "Cables", "4K ready", false),
            record(4, "Phone Grip", "Accessories", "Works with any cable case", true),
            record(5, "Mystery", "", "", false),
        ]
    }

    fn ids(records: &[&ProductRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_filter_by_category_is_exact() {
        let records = sample();
        assert_eq!(ids(&filter_by_category(&records, "Cables")), vec![1, 3]);
        assert!(filter_by_category(&records, "cables").is_empty());
    }

    #[test]
    fn test_search_matches_name_description_or_category() {
        let records = sample();

        assert_eq!(ids(&search(&records, "CABLE")), vec![1, 3, 4]);
        assert_eq!(ids(&search(&records, "fast")), vec![2]);
        assert_eq!(ids(&search(&records, "accessor")), vec![4]);
        assert!(search(&records, "nothing like this").is_empty());
    }

    #[test]
    fn test_search_empty_query_matches_all() {
        let records = sample();
        assert_eq!(search(&records, "").len(), records.len());
    }

    #[test]
    fn test_filter_applies_category_then_search() {
        let records = sample();

        assert_eq!(ids(&filter(&records, Some("Cables"), Some("hdmi"))), vec![3]);
        assert_eq!(ids(&filter(&records, Some("Accessories"), None)), vec![4]);
        assert_eq!(ids(&filter(&records, None, Some("cable"))), vec![1, 3, 4]);
        assert_eq!(filter(&records, None, None).len(), 5);
    }

    #[test]
    fn test_by_id() {
        let records = sample();
        assert_eq!(by_id(&records, 2).map(|r| r.name.as_str()), Some("Wireless Charger"));
        assert!(by_id(&records, 99).is_none());
    }

    #[test]
    fn test_featured() {
        let records = sample();
        assert_eq!(ids(&featured(&records)), vec![1, 4]);
    }

    #[test]
    fn test_categories_distinct_in_first_seen_order() {
        let records = sample();
        assert_eq!(categories(&records), vec!["Cables", "Chargers", "Accessories"]);
    }

    #[test]
    fn test_selection_apply() {
        let records = sample();

        assert_eq!(Selection::All.apply(&records).len(), 5);
        assert_eq!(
            ids(&Selection::Category("Chargers".to_string()).apply(&records)),
            vec![2]
        );
        assert_eq!(
            ids(&Selection::Search("grip".to_string()).apply(&records)),
            vec![4]
        );
    }

    #[test]
    fn test_selection_default_is_all() {
        assert_eq!(Selection::default(), Selection::All);
    }
}
