//! Per-view browsing state and its reducer.
//!
//! A [`Session`] owns the loaded records, every piece of mutable view state
//! (filters, sort, visibility, pan/zoom, hover) and the outputs derived from
//! them. State only changes through [`Session::apply_event`]; derived outputs
//! are recomputed eagerly when an event touches their inputs, and
//! [`Session::revision`] is bumped only when an event actually changed
//! something, so presentations can skip redundant work.

use std::time::{Duration, Instant};

use crate::dataset::{year_limits, TagCatalog};
use crate::event::SessionEvent;
use crate::filter::{filter_indices, FilterState};
use crate::record::EventRecord;
use crate::table::{build_table, SortState, TableView, VisibilityState};
use crate::timeline::{build_timeline, LayoutParams, TimelineLayout};
use crate::viewport::{DragState, ViewTransform, Viewport};
use crate::year_range::{Bound, YearRangeInput, DEFAULT_CORRECTION_DELAY};

/// Initial state for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub visibility: VisibilityState,
    pub sort: SortState,
    pub layout: LayoutParams,
    pub year_debounce: Duration,
    /// Visible width of the timeline area.
    pub viewport_width: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            visibility: VisibilityState::default(),
            sort: SortState::default(),
            layout: LayoutParams::default(),
            year_debounce: DEFAULT_CORRECTION_DELAY,
            viewport_width: 0.0,
        }
    }
}

pub struct Session {
    records: Vec<EventRecord>,
    catalog: TagCatalog,
    filter: FilterState,
    visibility: VisibilityState,
    sort: SortState,
    year_input: YearRangeInput,
    viewport: Viewport,
    layout_params: LayoutParams,

    // Derived
    filtered: Vec<usize>,
    table: TableView,
    timeline: TimelineLayout,
    revision: u64,
}

impl Session {
    pub fn new(records: Vec<EventRecord>, options: SessionOptions) -> Self {
        let year_input = YearRangeInput::new(year_limits(&records), options.year_debounce);
        let filter = FilterState {
            year_range: year_input.initial_range(),
            ..FilterState::default()
        };
        let catalog = TagCatalog::from_records(&records);
        let mut session = Self {
            records,
            catalog,
            filter,
            visibility: options.visibility,
            sort: options.sort,
            year_input,
            viewport: Viewport::new(0.0, options.viewport_width),
            timeline: TimelineLayout::empty(options.layout),
            layout_params: options.layout,
            filtered: Vec::new(),
            table: TableView::NothingVisible,
            revision: 0,
        };
        session.refilter();
        session
    }

    pub fn with_catalog(mut self, catalog: TagCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&EventRecord> {
        self.records.get(index)
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn year_input(&self) -> &YearRangeInput {
        &self.year_input
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Indices of records passing the current filters, in load order.
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn timeline(&self) -> &TimelineLayout {
        &self.timeline
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// When the next [`Session::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.year_input.correction_due_at()
    }

    pub fn apply_event(&mut self, event: SessionEvent) {
        self.apply_event_at(event, Instant::now());
    }

    /// Apply one event. `now` anchors the year-correction deadline.
    ///
    /// The revision only moves when the event changed some state.
    pub fn apply_event_at(&mut self, event: SessionEvent, now: Instant) {
        let view_before = (self.viewport.transform(), self.viewport.drag_state());
        let changed = match event {
            SessionEvent::SetFreeText(text) => {
                let changed = self.filter.free_text != text;
                if changed {
                    self.filter.free_text = text;
                    self.refilter();
                }
                changed
            }
            SessionEvent::ToggleFreeTextVisibleOnly => {
                self.filter.free_text_visible_only = !self.filter.free_text_visible_only;
                self.refilter();
                true
            }
            // Edits always move the text or the pending correction
            SessionEvent::EditYear { bound, text } => {
                let range = self.year_input.edit(bound, &text, self.filter.year_range, now);
                self.filter.year_range = range;
                self.refilter();
                true
            }
            SessionEvent::CorrectYearRange => {
                self.filter.year_range = self.year_input.correct();
                self.refilter();
                true
            }
            SessionEvent::ToggleTag(tag) => {
                self.filter.toggle_tag(&tag);
                self.refilter();
                true
            }
            SessionEvent::ClearTags => {
                let changed = !self.filter.selected_tags.is_empty();
                if changed {
                    self.filter.selected_tags.clear();
                    self.refilter();
                }
                changed
            }

            SessionEvent::SetColumnVisible { field, visible } => {
                let before = self.visibility.clone();
                self.visibility.set(field, visible);
                let changed = self.visibility != before;
                if changed {
                    self.visibility_changed();
                }
                changed
            }
            SessionEvent::ToggleColumn(field) => {
                self.visibility.toggle(field);
                self.visibility_changed();
                true
            }
            SessionEvent::ToggleSort { field, multi } => {
                self.sort.toggle(field, multi);
                self.rebuild_table();
                true
            }
            SessionEvent::ClearSort => {
                let unsorted = SortState::unsorted();
                let changed = self.sort != unsorted;
                if changed {
                    self.sort = unsorted;
                    self.rebuild_table();
                }
                changed
            }

            SessionEvent::PointerDown(x) => self.view_changed(view_before, |v| v.pointer_down(x)),
            SessionEvent::PointerMove(x) => self.view_changed(view_before, |v| v.pointer_move(x)),
            SessionEvent::PointerUp => self.view_changed(view_before, Viewport::pointer_up),
            SessionEvent::Wheel(delta_y) => self.view_changed(view_before, |v| v.wheel(delta_y)),
            SessionEvent::PanBy(delta) => self.view_changed(view_before, |v| v.pan_by(delta)),
            SessionEvent::ZoomIn => self.view_changed(view_before, Viewport::zoom_in),
            SessionEvent::ZoomOut => self.view_changed(view_before, Viewport::zoom_out),
            SessionEvent::ResetView => self.view_changed(view_before, Viewport::reset),
            SessionEvent::ResizeViewport(width) => {
                let changed = self.viewport.viewport_width() != width;
                let content = self.viewport.content_width();
                self.viewport.set_extent(content, width);
                changed
            }
            SessionEvent::HoverAt(screen_x) => {
                let offset = self.viewport.transform().offset_x;
                let index = screen_x.and_then(|x| self.timeline.hit_test(x - offset));
                let before = self.timeline.hovered();
                self.timeline.set_hovered(index);
                self.timeline.hovered() != before
            }
            SessionEvent::HoverNode(index) => {
                let before = self.timeline.hovered();
                self.timeline.set_hovered(index);
                self.timeline.hovered() != before
            }
            SessionEvent::NodeMeasured { index, marker } => {
                let before = self.timeline.measured(index);
                if !self.timeline.record_measurement(index, marker) {
                    tracing::debug!(index, "measurement for unknown timeline node ignored");
                    false
                } else {
                    before != Some(marker)
                }
            }
        };
        if changed {
            self.revision += 1;
        }
    }

    /// Run scheduled work that has come due. Returns true if state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.year_input.poll(now) {
            Some(range) => {
                tracing::debug!(min = range.min, max = range.max, "year range corrected");
                self.filter.year_range = range;
                self.refilter();
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Text of a year input, as the user typed it or as last corrected.
    pub fn year_text(&self, bound: Bound) -> &str {
        self.year_input.text(bound)
    }

    /// Run a viewport operation and report whether pan, zoom or drag moved.
    fn view_changed(
        &mut self,
        before: (ViewTransform, DragState),
        op: impl FnOnce(&mut Viewport),
    ) -> bool {
        op(&mut self.viewport);
        (self.viewport.transform(), self.viewport.drag_state()) != before
    }

    fn visibility_changed(&mut self) {
        if self.filter.free_text_visible_only && !self.filter.free_text.is_empty() {
            self.refilter();
        } else {
            self.rebuild_table();
        }
    }

    /// Recompute every derived output from the current filter state.
    fn refilter(&mut self) {
        self.filtered = filter_indices(&self.records, &self.filter, &self.visibility);
        self.rebuild_table();
        self.timeline = build_timeline(&self.records, &self.filtered, self.layout_params);
        let viewport_width = self.viewport.viewport_width();
        self.viewport
            .set_extent(self.timeline.content_width(), viewport_width);
        tracing::trace!(
            shown = self.filtered.len(),
            total = self.records.len(),
            nodes = self.timeline.len(),
            "refiltered"
        );
    }

    fn rebuild_table(&mut self) {
        self.table = build_table(&self.records, &self.filtered, &self.visibility, &self.sort);
    }
}
