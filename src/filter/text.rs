//! Free-text matching over a serialized projection of a record.
//!
//! The record's searchable fields are serialized to a JSON object, lowercased,
//! and matched against the lowercased query. A second, diacritic-stripped copy
//! of the haystack is also tried so that plain-ASCII queries find accented
//! text. The query itself is only lowercased, never stripped.

use super::RecordFilter;
use crate::record::{EventRecord, Field, FieldValue};
use serde_json::{Map, Value};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Substring filter over the JSON projection of selected fields.
pub struct TextFilter {
    query: String,
    fields: Vec<Field>,
    /// Also project the derived publication flag.
    with_publication: bool,
}

impl TextFilter {
    /// Search only `fields`.
    pub fn new(query: &str, fields: &[Field]) -> Self {
        Self {
            query: query.to_lowercase(),
            fields: fields.to_vec(),
            with_publication: false,
        }
    }

    /// Search every field plus the publication flag.
    pub fn whole_record(query: &str) -> Self {
        Self {
            with_publication: true,
            ..Self::new(query, &Field::ALL)
        }
    }
}

impl RecordFilter for TextFilter {
    fn matches(&self, record: &EventRecord) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let haystack = project(record, &self.fields, self.with_publication).to_lowercase();
        haystack.contains(&self.query) || strip_diacritics(&haystack).contains(&self.query)
    }

    fn description(&self) -> String {
        format!("Text: {:?} in {} field(s)", self.query, self.fields.len())
    }
}

/// Serialize the given fields of a record as a compact JSON object with
/// keys in alphabetical order.
///
/// Missing values are omitted so they never produce matches.
pub fn project(record: &EventRecord, fields: &[Field], with_publication: bool) -> String {
    let mut object = Map::new();
    for &field in fields {
        let value = match record.value(field) {
            value if value.is_missing() => continue,
            FieldValue::Year(Some(year)) => Value::from(year),
            FieldValue::Year(None) => continue,
            FieldValue::Text(text) => Value::from(text),
            FieldValue::List(items) => Value::from(items.to_vec()),
        };
        object.insert(field.name().to_string(), value);
    }
    if with_publication {
        object.insert("publication".to_string(), Value::Bool(record.publication));
    }
    Value::Object(object).to_string()
}

/// Decompose and drop combining marks: "Göttingen" -> "Gottingen".
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Case- and accent-insensitive key used for ordering text.
pub fn fold_key(s: &str) -> String {
    strip_diacritics(&s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EventRecord {
        EventRecord {
            year: Some(1687),
            title: "Principia Mathematica".to_string(),
            author: "Isaac Newton".to_string(),
            city: "Göttingen".to_string(),
            tags: vec!["physics".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_query_matches() {
        assert!(TextFilter::new("", &Field::ALL).matches(&EventRecord::default()));
    }

    #[test]
    fn test_case_insensitive() {
        let filter = TextFilter::new("NEWTON", &Field::ALL);
        assert!(filter.matches(&record()));
    }

    #[test]
    fn test_plain_query_matches_accented_text() {
        let filter = TextFilter::new("gottingen", &Field::ALL);
        assert!(filter.matches(&record()));
    }

    #[test]
    fn test_accented_query_matches_accented_text() {
        let filter = TextFilter::new("Göttingen", &Field::ALL);
        assert!(filter.matches(&record()));
    }

    #[test]
    fn test_accented_query_does_not_match_plain_text() {
        let mut plain = record();
        plain.city = "Gottingen".to_string();
        let filter = TextFilter::new("göttingen", &Field::ALL);
        assert!(!filter.matches(&plain));
    }

    #[test]
    fn test_projection_restricts_fields() {
        let filter = TextFilter::new("newton", &[Field::Year, Field::Title]);
        assert!(!filter.matches(&record()));
        let filter = TextFilter::new("principia", &[Field::Year, Field::Title]);
        assert!(filter.matches(&record()));
    }

    #[test]
    fn test_year_is_searchable() {
        let filter = TextFilter::new("1687", &Field::ALL);
        assert!(filter.matches(&record()));
    }

    #[test]
    fn test_projection_format() {
        let json = project(&record(), &[Field::Year, Field::Tags, Field::Details], false);
        assert_eq!(json, r#"{"tags":["physics"],"year":1687}"#);
    }

    #[test]
    fn test_projection_escapes_quotes() {
        let mut rec = record();
        rec.title = "The \"Dialogue\"".to_string();
        let json = project(&rec, &[Field::Title], false);
        assert_eq!(json, r#"{"title":"The \"Dialogue\""}"#);
    }

    #[test]
    fn test_whole_record_search_sees_publication_flag() {
        let mut rec = record();
        rec.publication = true;
        assert!(TextFilter::whole_record("\"publication\":true").matches(&rec));
        assert!(!TextFilter::whole_record("\"publication\":true").matches(&record()));
        assert!(!TextFilter::new("publication", &Field::ALL).matches(&rec));
    }

    #[test]
    fn test_projection_appends_publication() {
        let json = project(&record(), &[Field::Year], true);
        assert_eq!(json, r#"{"publication":false,"year":1687}"#);
    }

    #[test]
    fn test_fold_key() {
        assert_eq!(fold_key("École"), "ecole");
        assert_eq!(fold_key("about"), fold_key("About"));
    }
}
