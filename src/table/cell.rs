//! Cell rendering dispatched on the closed field set.

use crate::record::{EventRecord, Field, FieldValue};
use regex::Regex;
use std::sync::LazyLock;

static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid URL scheme regex"));

/// One entry of a sources cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub text: String,
    /// Entry starts with a URL scheme and should be presented as a link.
    pub is_link: bool,
}

/// Presentation-neutral content of a table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Blank,
    Text(String),
    /// One paragraph per line, order significant.
    Lines(Vec<String>),
    Tags(Vec<String>),
    Sources(Vec<SourceRef>),
}

impl Cell {
    /// Single-string rendering used by plain-text output and width estimates.
    pub fn plain(&self) -> String {
        match self {
            Cell::Blank => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Lines(lines) => lines.join(" / "),
            Cell::Tags(tags) => tags.join(", "),
            Cell::Sources(sources) => sources
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" ; "),
        }
    }
}

pub fn is_link(source: &str) -> bool {
    URL_SCHEME.is_match(source)
}

pub fn render_cell(record: &EventRecord, field: Field) -> Cell {
    let value = record.value(field);
    if value.is_missing() {
        return Cell::Blank;
    }
    match (field, value) {
        (_, FieldValue::Year(Some(year))) => Cell::Text(year.to_string()),
        (Field::Details, FieldValue::List(items)) => Cell::Lines(items.to_vec()),
        (Field::Tags, FieldValue::List(items)) => Cell::Tags(items.to_vec()),
        (Field::Sources, FieldValue::List(items)) => Cell::Sources(
            items
                .iter()
                .map(|s| SourceRef {
                    text: s.clone(),
                    is_link: is_link(s),
                })
                .collect(),
        ),
        (_, FieldValue::List(items)) => Cell::Text(
            items
                .iter()
                .map(|s| start_case(s))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        (_, FieldValue::Text(s)) => Cell::Text(start_case(s)),
        (_, FieldValue::Year(None)) => Cell::Blank,
    }
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Split into words and capitalize each: "hello-world" -> "Hello World",
/// "fooBar" -> "Foo Bar". Apostrophes inside a word are kept.
pub fn start_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        let in_word = c.is_alphanumeric()
            || (is_apostrophe(c) && !current.is_empty() && next.is_some_and(char::is_alphabetic));
        if !in_word {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        if let Some(p) = prev {
            let boundary = (p.is_lowercase() && c.is_uppercase())
                || (p.is_alphabetic() && c.is_numeric())
                || (p.is_numeric() && c.is_alphabetic())
                || (p.is_uppercase() && c.is_uppercase() && next.is_some_and(char::is_lowercase));
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_case() {
        assert_eq!(start_case("about"), "About");
        assert_eq!(start_case("hello-world"), "Hello World");
        assert_eq!(start_case("fooBar"), "Foo Bar");
        assert_eq!(start_case("  spaced   out "), "Spaced Out");
        assert_eq!(start_case("XMLHttp"), "XML Http");
        assert_eq!(start_case("Galileo's dialogue"), "Galileo's Dialogue");
        assert_eq!(start_case("latin"), "Latin");
        assert_eq!(start_case(""), "");
    }

    #[test]
    fn test_is_link() {
        assert!(is_link("https://example.org"));
        assert!(is_link("ftp://archive"));
        assert!(!is_link("Opera omnia, vol. 3"));
        assert!(!is_link("http:missing-slashes"));
    }

    #[test]
    fn test_render_blank() {
        let record = EventRecord::default();
        assert_eq!(render_cell(&record, Field::Year), Cell::Blank);
        assert_eq!(render_cell(&record, Field::Title), Cell::Blank);
        assert_eq!(render_cell(&record, Field::Sources), Cell::Blank);
    }

    #[test]
    fn test_render_by_field() {
        let record = EventRecord {
            year: Some(1610),
            author: "galileo galilei".to_string(),
            details: vec!["one".to_string(), "two".to_string()],
            sources: vec!["https://a.example".to_string(), "Book".to_string()],
            individuals: vec!["kepler".to_string(), "brahe".to_string()],
            tags: vec!["astronomy".to_string()],
            ..Default::default()
        };
        assert_eq!(render_cell(&record, Field::Year), Cell::Text("1610".to_string()));
        assert_eq!(render_cell(&record, Field::Author), Cell::Text("Galileo Galilei".to_string()));
        assert_eq!(
            render_cell(&record, Field::Details),
            Cell::Lines(vec!["one".to_string(), "two".to_string()])
        );
        assert_eq!(
            render_cell(&record, Field::Individuals),
            Cell::Text("Kepler, Brahe".to_string())
        );
        assert_eq!(render_cell(&record, Field::Tags), Cell::Tags(vec!["astronomy".to_string()]));
        match render_cell(&record, Field::Sources) {
            Cell::Sources(sources) => {
                assert!(sources[0].is_link);
                assert!(!sources[1].is_link);
            }
            other => panic!("unexpected cell {:?}", other),
        }
    }

    #[test]
    fn test_plain_sources_separator() {
        let cell = Cell::Sources(vec![
            SourceRef { text: "a".to_string(), is_link: false },
            SourceRef { text: "b".to_string(), is_link: false },
        ]);
        assert_eq!(cell.plain(), "a ; b");
    }
}
