pub mod engine;
pub mod tags;
pub mod text;
pub mod year;

use crate::record::EventRecord;
use std::collections::BTreeSet;

pub use engine::{filter_indices, filter_records, FilterPipeline};

/// Trait for composable record predicates
pub trait RecordFilter {
    fn matches(&self, record: &EventRecord) -> bool;

    fn description(&self) -> String;
}

/// Inclusive year bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i64,
    pub max: i64,
}

impl YearRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Bounds that admit every year.
    pub fn unbounded() -> Self {
        Self {
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    pub fn contains(&self, year: i64) -> bool {
        self.min <= year && year <= self.max
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Active filter criteria for a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// Case-insensitive substring query. Empty matches everything.
    pub free_text: String,
    /// Restrict free-text matching to the currently visible columns.
    pub free_text_visible_only: bool,
    pub year_range: YearRange,
    /// Empty set means no tag filter.
    pub selected_tags: BTreeSet<String>,
}

impl FilterState {
    /// Toggle a tag in the selection, returning whether it is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.selected_tags.remove(tag) {
            false
        } else {
            self.selected_tags.insert(tag.to_string());
            true
        }
    }

    pub fn is_active(&self) -> bool {
        !self.free_text.is_empty()
            || !self.selected_tags.is_empty()
            || self.year_range != YearRange::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_inclusive() {
        let range = YearRange::new(1600, 1700);
        assert!(range.contains(1600));
        assert!(range.contains(1700));
        assert!(!range.contains(1599));
        assert!(!range.contains(1701));
    }

    #[test]
    fn test_toggle_tag() {
        let mut state = FilterState::default();
        assert!(state.toggle_tag("x"));
        assert!(state.selected_tags.contains("x"));
        assert!(!state.toggle_tag("x"));
        assert!(state.selected_tags.is_empty());
    }

    #[test]
    fn test_default_is_inactive() {
        assert!(!FilterState::default().is_active());
    }
}
