//! Event records and their ingestion from the raw dataset shape.
//!
//! Raw records are coerced into [`EventRecord`] once at load time: tags are
//! sorted and deduplicated, the reserved `publication` tag is lifted into a
//! boolean flag, and missing or oddly-typed fields fall back to empty values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag value that marks a record as a publication. Never exposed as a tag.
pub const PUBLICATION_TAG: &str = "publication";

/// Closed set of record fields exposed to the table and the search projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Year,
    Title,
    Tags,
    Author,
    Language,
    Details,
    Sources,
    City,
    Individuals,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; 9] = [
        Field::Year,
        Field::Title,
        Field::Tags,
        Field::Author,
        Field::Language,
        Field::Details,
        Field::Sources,
        Field::City,
        Field::Individuals,
    ];

    /// Key used in the dataset and config files.
    pub fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Title => "title",
            Field::Tags => "tags",
            Field::Author => "author",
            Field::Language => "language",
            Field::Details => "details",
            Field::Sources => "sources",
            Field::City => "city",
            Field::Individuals => "individuals",
        }
    }

    /// Column header text.
    pub fn header(self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::Title => "Title",
            Field::Tags => "Tags",
            Field::Author => "Author",
            Field::Language => "Language",
            Field::Details => "Details",
            Field::Sources => "Sources",
            Field::City => "City",
            Field::Individuals => "Individuals",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Year)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A list field as it may appear in the dataset: a single string or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    Single(String),
    List(Vec<String>),
}

impl Default for StringList {
    fn default() -> Self {
        StringList::List(Vec::new())
    }
}

impl StringList {
    fn into_vec(self) -> Vec<String> {
        match self {
            StringList::Single(s) if s.is_empty() => Vec::new(),
            StringList::Single(s) => vec![s],
            StringList::List(v) => v,
        }
    }
}

/// Record shape as found in `{ "events": [...] }` before ingestion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEventRecord {
    /// Kept untyped so that strings and floats can be coerced instead of
    /// failing the whole document.
    pub year: serde_json::Value,
    pub title: Option<String>,
    pub tags: StringList,
    pub author: Option<String>,
    pub language: Option<String>,
    pub details: StringList,
    pub sources: StringList,
    pub city: Option<String>,
    pub individuals: StringList,
}

/// One immutable, ingested event record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventRecord {
    /// `None` when the dataset has no usable year for this record.
    pub year: Option<i64>,
    pub title: String,
    /// Sorted and deduplicated; never contains [`PUBLICATION_TAG`].
    pub tags: Vec<String>,
    pub author: String,
    pub language: String,
    pub details: Vec<String>,
    pub sources: Vec<String>,
    pub city: String,
    pub individuals: Vec<String>,
    /// True iff the raw tags contained [`PUBLICATION_TAG`].
    pub publication: bool,
}

/// Borrowed view of a single field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Year(Option<i64>),
    Text(&'a str),
    List(&'a [String]),
}

impl FieldValue<'_> {
    /// Absent year, empty string and empty list all count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Year(y) => y.is_none(),
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(l) => l.is_empty(),
        }
    }
}

impl EventRecord {
    /// Ingest a raw record.
    pub fn from_raw(raw: RawEventRecord) -> Self {
        let mut tags = raw.tags.into_vec();
        tags.sort();
        tags.dedup();
        let publication = match tags.binary_search_by(|t| t.as_str().cmp(PUBLICATION_TAG)) {
            Ok(pos) => {
                tags.remove(pos);
                true
            }
            Err(_) => false,
        };

        Self {
            year: coerce_year(&raw.year),
            title: raw.title.unwrap_or_default(),
            tags,
            author: raw.author.unwrap_or_default(),
            language: raw.language.unwrap_or_default(),
            details: raw.details.into_vec(),
            sources: raw.sources.into_vec(),
            city: raw.city.unwrap_or_default(),
            individuals: raw.individuals.into_vec(),
            publication,
        }
    }

    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Year => FieldValue::Year(self.year),
            Field::Title => FieldValue::Text(&self.title),
            Field::Tags => FieldValue::List(&self.tags),
            Field::Author => FieldValue::Text(&self.author),
            Field::Language => FieldValue::Text(&self.language),
            Field::Details => FieldValue::List(&self.details),
            Field::Sources => FieldValue::List(&self.sources),
            Field::City => FieldValue::Text(&self.city),
            Field::Individuals => FieldValue::List(&self.individuals),
        }
    }

    pub fn has_any_tag<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter()
            .any(|t| self.tags.binary_search_by(|own| own.as_str().cmp(t.as_ref())).is_ok())
    }
}

/// Integers, integral floats and numeric strings are years; anything else is absent.
fn coerce_year(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ingest(value: serde_json::Value) -> EventRecord {
        EventRecord::from_raw(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_tags_sorted_and_deduplicated() {
        let record = ingest(json!({"year": 1600, "tags": ["b", "a", "b"]}));
        assert_eq!(record.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_publication_tag_extracted() {
        let record = ingest(json!({"tags": ["science", "publication", "publication"]}));
        assert!(record.publication);
        assert_eq!(record.tags, vec!["science"]);
    }

    #[test]
    fn test_no_publication_tag() {
        let record = ingest(json!({"tags": ["science"]}));
        assert!(!record.publication);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record = ingest(json!({}));
        assert_eq!(record.year, None);
        assert!(record.title.is_empty());
        assert!(record.tags.is_empty());
        assert!(record.details.is_empty());
    }

    #[test]
    fn test_year_coercion() {
        assert_eq!(ingest(json!({"year": 1650})).year, Some(1650));
        assert_eq!(ingest(json!({"year": 1650.0})).year, Some(1650));
        assert_eq!(ingest(json!({"year": " 1650 "})).year, Some(1650));
        assert_eq!(ingest(json!({"year": 1650.5})).year, None);
        assert_eq!(ingest(json!({"year": "circa 1650"})).year, None);
        assert_eq!(ingest(json!({"year": null})).year, None);
        assert_eq!(ingest(json!({"year": -44})).year, Some(-44));
    }

    #[test]
    fn test_single_string_list_field() {
        let record = ingest(json!({"sources": "https://example.org", "details": ""}));
        assert_eq!(record.sources, vec!["https://example.org"]);
        assert!(record.details.is_empty());
    }

    #[test]
    fn test_details_order_preserved() {
        let record = ingest(json!({"details": ["second", "first"]}));
        assert_eq!(record.details, vec!["second", "first"]);
    }

    #[test]
    fn test_field_from_name() {
        assert_eq!(Field::from_name("year"), Some(Field::Year));
        assert_eq!(Field::from_name("Individuals"), Some(Field::Individuals));
        assert_eq!(Field::from_name("nope"), None);
    }

    #[test]
    fn test_has_any_tag() {
        let record = ingest(json!({"tags": ["x", "y"]}));
        assert!(record.has_any_tag(&["y"]));
        assert!(record.has_any_tag(&["z", "x"]));
        assert!(!record.has_any_tag(&["z"]));
    }
}
