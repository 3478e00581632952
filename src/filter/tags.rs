use super::RecordFilter;
use crate::record::EventRecord;
use std::collections::BTreeSet;

/// Keeps records carrying at least one of the selected tags.
/// An empty selection disables the filter.
pub struct TagFilter {
    selected: Vec<String>,
}

impl TagFilter {
    pub fn new(selected: &BTreeSet<String>) -> Self {
        Self {
            selected: selected.iter().cloned().collect(),
        }
    }
}

impl RecordFilter for TagFilter {
    fn matches(&self, record: &EventRecord) -> bool {
        self.selected.is_empty() || record.has_any_tag(&self.selected)
    }

    fn description(&self) -> String {
        if self.selected.is_empty() {
            "Tags: any".to_string()
        } else {
            format!("Tags: {}", self.selected.join(" | "))
        }
    }
}
