use super::tags::TagFilter;
use super::text::TextFilter;
use super::year::YearFilter;
use super::{FilterState, RecordFilter};
use crate::record::EventRecord;
use crate::table::VisibilityState;

/// All active criteria; a record must satisfy every one of them.
pub struct FilterPipeline {
    filters: Vec<Box<dyn RecordFilter>>,
}

impl FilterPipeline {
    /// Build the pipeline for a filter state. The visibility state decides the
    /// free-text projection when `free_text_visible_only` is set.
    pub fn new(state: &FilterState, visibility: &VisibilityState) -> Self {
        let mut filters: Vec<Box<dyn RecordFilter>> = vec![Box::new(YearFilter::new(state.year_range))];

        if !state.selected_tags.is_empty() {
            filters.push(Box::new(TagFilter::new(&state.selected_tags)));
        }

        if !state.free_text.is_empty() {
            let text = if state.free_text_visible_only {
                TextFilter::new(&state.free_text, &visibility.visible_fields())
            } else {
                TextFilter::whole_record(&state.free_text)
            };
            filters.push(Box::new(text));
        }

        Self { filters }
    }

    pub fn matches(&self, record: &EventRecord) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    pub fn describe(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

/// Indices of the records that pass the filter, in their original order.
pub fn filter_indices(
    records: &[EventRecord],
    state: &FilterState,
    visibility: &VisibilityState,
) -> Vec<usize> {
    let pipeline = FilterPipeline::new(state, visibility);
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| pipeline.matches(record))
        .map(|(idx, _)| idx)
        .collect()
}

/// Records that pass the filter, in their original order.
pub fn filter_records<'a>(
    records: &'a [EventRecord],
    state: &FilterState,
    visibility: &VisibilityState,
) -> Vec<&'a EventRecord> {
    let pipeline = FilterPipeline::new(state, visibility);
    records.iter().filter(|r| pipeline.matches(r)).collect()
}
