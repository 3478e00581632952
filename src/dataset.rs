//! Dataset loading: the events document and the companion tags document.
//!
//! Strict loaders return errors with context for the command-line front-end.
//! The `_or_empty` variants log the failure and degrade to an empty dataset,
//! which is what an interactive session uses.

use crate::record::{EventRecord, RawEventRecord};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct EventsDocument {
    #[serde(default)]
    events: Vec<serde_json::Value>,
}

/// Auxiliary description of a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TagDetails {
    pub related_tags: Vec<String>,
    pub details: Vec<String>,
    pub sources: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TagsDocument {
    #[serde(default)]
    tags: Vec<BTreeMap<String, TagDetails>>,
}

/// Parse an events document. Individual records that are not objects are
/// skipped with a warning instead of failing the document.
pub fn parse_events(json: &str) -> Result<Vec<EventRecord>> {
    let doc: EventsDocument = serde_json::from_str(json).context("Invalid events document")?;
    let mut records = Vec::with_capacity(doc.events.len());
    for (idx, value) in doc.events.into_iter().enumerate() {
        match serde_json::from_value::<RawEventRecord>(value) {
            Ok(raw) => records.push(EventRecord::from_raw(raw)),
            Err(e) => tracing::warn!(index = idx, error = %e, "skipping malformed event record"),
        }
    }
    let undated = records.iter().filter(|r| r.year.is_none()).count();
    if undated > 0 {
        tracing::debug!(undated, "records without a usable year are kept out of the timeline");
    }
    Ok(records)
}

pub fn load_events(path: &Path) -> Result<Vec<EventRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events file {}", path.display()))?;
    let records =
        parse_events(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!(path = %path.display(), count = records.len(), "loaded events");
    Ok(records)
}

/// Load events, degrading to an empty list on any failure.
pub fn load_events_or_empty(path: &Path) -> Vec<EventRecord> {
    match load_events(path) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "events unavailable, continuing with an empty dataset");
            Vec::new()
        }
    }
}

/// Parse a tags document into (tag, details) pairs in document order.
pub fn parse_tags(json: &str) -> Result<Vec<(String, TagDetails)>> {
    let doc: TagsDocument = serde_json::from_str(json).context("Invalid tags document")?;
    Ok(doc.tags.into_iter().flat_map(|entry| entry.into_iter()).collect())
}

pub fn load_tags(path: &Path) -> Result<Vec<(String, TagDetails)>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tags file {}", path.display()))?;
    parse_tags(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_tags_or_empty(path: &Path) -> Vec<(String, TagDetails)> {
    match load_tags(path) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "tag details unavailable");
            Vec::new()
        }
    }
}

/// Smallest and largest year in the dataset.
pub fn year_limits(records: &[EventRecord]) -> Option<(i64, i64)> {
    let mut years = records.iter().filter_map(|r| r.year);
    let first = years.next()?;
    Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
}

/// Tag usage counts plus optional per-tag descriptions.
#[derive(Debug, Clone, Default)]
pub struct TagCatalog {
    counts: BTreeMap<String, usize>,
    details: Vec<(String, TagDetails)>,
}

impl TagCatalog {
    pub fn from_records(records: &[EventRecord]) -> Self {
        let mut counts = BTreeMap::new();
        for tag in records.iter().flat_map(|r| r.tags.iter()) {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
        Self {
            counts,
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<(String, TagDetails)>) -> Self {
        self.details = details;
        self
    }

    pub fn count(&self, tag: &str) -> usize {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    /// All known tags, alphabetical.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Tags ordered for a picker: most used first, then alphabetical.
    pub fn by_frequency(&self) -> Vec<(&str, usize)> {
        let mut tags: Vec<(&str, usize)> = self.counts.iter().map(|(t, c)| (t.as_str(), *c)).collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        tags
    }

    /// Described tags in document order.
    pub fn details(&self) -> &[(String, TagDetails)] {
        &self.details
    }

    pub fn details_for(&self, tag: &str) -> Option<&TagDetails> {
        self.details.iter().find(|(t, _)| t == tag).map(|(_, d)| d)
    }

    /// Related tags of `tag`, rarest first, then alphabetical.
    pub fn related(&self, tag: &str) -> Vec<&str> {
        let Some(details) = self.details_for(tag) else {
            return Vec::new();
        };
        let mut related: Vec<&str> = details.related_tags.iter().map(String::as_str).collect();
        related.sort_by(|a, b| self.count(a).cmp(&self.count(b)).then_with(|| a.cmp(b)));
        related
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EVENTS: &str = r#"{
        "events": [
            {"year": 1600, "title": "A", "tags": ["x", "publication"]},
            {"year": "1650", "title": "B", "tags": ["y", "x"]},
            {"year": "unknown", "title": "C"},
            42
        ]
    }"#;

    #[test]
    fn test_parse_events_tolerates_bad_records() {
        let records = parse_events(EVENTS).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].publication);
        assert_eq!(records[0].tags, vec!["x"]);
        assert_eq!(records[1].year, Some(1650));
        assert_eq!(records[2].year, None);
    }

    #[test]
    fn test_parse_events_rejects_non_json() {
        assert!(parse_events("not json").is_err());
    }

    #[test]
    fn test_missing_events_key_is_empty() {
        assert!(parse_events("{}").unwrap().is_empty());
    }

    #[test]
    fn test_load_events_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EVENTS.as_bytes()).unwrap();
        let records = load_events(file.path()).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_load_or_empty_degrades() {
        let records = load_events_or_empty(Path::new("/nonexistent/events.json"));
        assert!(records.is_empty());

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ broken").unwrap();
        assert!(load_events_or_empty(file.path()).is_empty());
    }

    #[test]
    fn test_year_limits() {
        let records = parse_events(EVENTS).unwrap();
        assert_eq!(year_limits(&records), Some((1600, 1650)));
        assert_eq!(year_limits(&[]), None);
    }

    #[test]
    fn test_parse_tags() {
        let json = r#"{"tags": [
            {"astronomy": {"related_tags": ["physics", "optics"], "details": ["Stars"]}},
            {"physics": {"related_tags": []}}
        ]}"#;
        let tags = parse_tags(json).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].0, "astronomy");
        assert_eq!(tags[0].1.details, vec!["Stars"]);
        assert!(tags[1].1.sources.is_empty());
    }

    #[test]
    fn test_tag_catalog_counts_and_order() {
        let records = parse_events(EVENTS).unwrap();
        let catalog = TagCatalog::from_records(&records);
        assert_eq!(catalog.count("x"), 2);
        assert_eq!(catalog.count("y"), 1);
        assert_eq!(catalog.count("publication"), 0);
        assert_eq!(catalog.by_frequency(), vec![("x", 2), ("y", 1)]);
    }

    #[test]
    fn test_related_tags_rarest_first() {
        let records = parse_events(EVENTS).unwrap();
        let details = vec![(
            "x".to_string(),
            TagDetails {
                related_tags: vec!["x".to_string(), "zzz".to_string(), "y".to_string()],
                ..Default::default()
            },
        )];
        let catalog = TagCatalog::from_records(&records).with_details(details);
        assert_eq!(catalog.related("x"), vec!["zzz", "y", "x"]);
        assert!(catalog.related("y").is_empty());
    }
}
