use serde::{Deserialize, Serialize};

/// Sentinel category name meaning "no filter"
pub const ALL_CATEGORIES: &str = "all";

/// A single quote - the star of the show
///
/// There is no id field. Identity is the (text, category) pair: two records
/// are the same quote iff the text matches exactly and the category matches
/// under the case-insensitive policy below.
///
/// Fields default to empty strings on deserialization so bulk imports accept
/// partial objects without per-record validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

impl QuoteRecord {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Identity check: exact text, case-insensitive category
    pub fn same_quote(&self, other: &QuoteRecord) -> bool {
        self.text == other.text && category_eq(&self.category, &other.category)
    }
}

/// Category comparison policy: case-insensitive compare, case-preserving
/// storage. Applied consistently to filtering, category listing, and merge
/// identity.
pub fn category_eq(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// The ordered set of all known quotes
///
/// Insertion order is preserved and value duplicates are allowed on add and
/// import. Dedup only happens during sync merge, against quote identity.
/// Nothing ever deletes from this collection; it only grows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct QuoteCollection(Vec<QuoteRecord>);

impl QuoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<QuoteRecord>) -> Self {
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuoteRecord> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[QuoteRecord] {
        &self.0
    }

    pub fn push(&mut self, record: QuoteRecord) {
        self.0.push(record);
    }

    /// Whether any existing record is the same quote (identity, not equality)
    pub fn contains(&self, record: &QuoteRecord) -> bool {
        self.0.iter().any(|q| q.same_quote(record))
    }

    /// Linear scan filter. `"all"` returns everything; an unmatched category
    /// yields an empty vec, never an error.
    pub fn filter_by_category(&self, name: &str) -> Vec<QuoteRecord> {
        if name == ALL_CATEGORIES {
            return self.0.clone();
        }
        self.0
            .iter()
            .filter(|q| category_eq(&q.category, name))
            .cloned()
            .collect()
    }

    /// Distinct categories in first-seen order, case-preserving
    pub fn distinct_categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for quote in &self.0 {
            if !seen.iter().any(|c| category_eq(c, &quote.category)) {
                seen.push(quote.category.clone());
            }
        }
        seen
    }

    /// Compact JSON, used for the persisted copy
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty JSON with two-space indentation, used for file export
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

impl<'a> IntoIterator for &'a QuoteCollection {
    type Item = &'a QuoteRecord;
    type IntoIter = std::slice::Iter<'a, QuoteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The fixed built-in collection used when nothing usable is persisted
pub fn seed_quotes() -> QuoteCollection {
    QuoteCollection::from_records(vec![
        QuoteRecord::new(
            "The best way to predict the future is to invent it.",
            "inspiration",
        ),
        QuoteRecord::new("Simplicity is the soul of efficiency.", "programming"),
        QuoteRecord::new("Well begun is half done.", "motivation"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_three_quotes() {
        assert_eq!(seed_quotes().len(), 3);
    }

    #[test]
    fn identity_is_exact_text_and_case_insensitive_category() {
        let a = QuoteRecord::new("Stay hungry.", "Life");
        let b = QuoteRecord::new("Stay hungry.", "life");
        let c = QuoteRecord::new("stay hungry.", "Life");

        assert!(a.same_quote(&b));
        assert!(!a.same_quote(&c));
    }

    #[test]
    fn filter_all_returns_everything() {
        let quotes = seed_quotes();
        assert_eq!(quotes.filter_by_category(ALL_CATEGORIES).len(), quotes.len());
    }

    #[test]
    fn filter_matches_category_case_insensitively() {
        let quotes = seed_quotes();
        let hits = quotes.filter_by_category("Programming");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Simplicity is the soul of efficiency.");
    }

    #[test]
    fn filter_unknown_category_is_empty() {
        let quotes = seed_quotes();
        assert!(quotes.filter_by_category("cooking").is_empty());
    }

    #[test]
    fn distinct_categories_preserve_first_seen_order_and_casing() {
        let mut quotes = QuoteCollection::new();
        quotes.push(QuoteRecord::new("a", "Wisdom"));
        quotes.push(QuoteRecord::new("b", "humor"));
        quotes.push(QuoteRecord::new("c", "wisdom"));

        assert_eq!(quotes.distinct_categories(), vec!["Wisdom", "humor"]);
    }

    #[test]
    fn duplicates_are_allowed_on_push() {
        let mut quotes = QuoteCollection::new();
        let record = QuoteRecord::new("again", "echo");
        quotes.push(record.clone());
        quotes.push(record);
        assert_eq!(quotes.len(), 2);
    }

    #[test]
    fn json_round_trip_preserves_content_and_order() {
        let quotes = seed_quotes();
        let json = quotes.to_pretty_json().unwrap();
        let back = QuoteCollection::from_json(&json).unwrap();
        assert_eq!(back, quotes);
    }

    #[test]
    fn pretty_json_uses_two_space_indentation() {
        let quotes = seed_quotes();
        let json = quotes.to_pretty_json().unwrap();
        assert!(json.contains("\n  {"));
    }

    #[test]
    fn record_deserializes_with_missing_fields() {
        let record: QuoteRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.text, "");
        assert_eq!(record.category, "");
    }
}
