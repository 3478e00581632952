pub mod event;

pub use event::AppEvent;

use chronoscope::event::SessionEvent;
use chronoscope::record::Field;
use chronoscope::session::Session;
use chronoscope::year_range::Bound;
use std::time::{Duration, Instant};

/// How long a status message stays in the status bar
const STATUS_MESSAGE_DURATION: Duration = Duration::from_secs(3);

/// Lightweight rectangle for storing layout areas (avoids ratatui dependency in app module)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl LayoutRect {
    /// Check if a point is inside the inner content area (excluding 1px borders on all sides)
    pub fn contains_inner(&self, column: u16, row: u16) -> bool {
        column > self.x
            && column < self.x + self.width.saturating_sub(1)
            && row > self.y
            && row < self.y + self.height.saturating_sub(1)
    }

    /// Terminal column relative to the inner content start
    pub fn inner_column(&self, column: u16) -> f64 {
        f64::from(column) - f64::from(self.x) - 1.0
    }

    pub fn inner_width(&self) -> u16 {
        self.width.saturating_sub(2)
    }
}

/// Cached layout areas from the most recent render pass.
/// Used by mouse handling to resolve targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutAreas {
    /// The timeline axis block (empty while the table is shown)
    pub timeline: LayoutRect,
    /// The table block (empty while the timeline is shown)
    pub table: LayoutRect,
}

/// Which presentation fills the main area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewTab {
    #[default]
    Table,
    Timeline,
}

/// Input mode for user interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EnteringSearch,
    EnteringYear(Bound),
    TagPicker,
    ColumnPicker,
}

/// Main application state
pub struct App {
    /// Records and every engine-level piece of state
    pub session: Session,

    pub view: ViewTab,

    /// Current input mode
    pub input_mode: InputMode,

    /// Input buffer for search and year entry
    pub input_buffer: String,

    /// Search text to restore when search input is cancelled
    search_before_input: String,

    /// Should the app quit
    pub should_quit: bool,

    pub show_help: bool,

    /// Selected row within the table rows
    pub selected_row: usize,

    /// Cursor within the open picker
    pub picker_cursor: usize,

    /// Timeline node picked with the keyboard
    pub selected_node: Option<usize>,

    /// Temporary status message shown in the status bar
    pub status_message: Option<(String, Instant)>,

    /// Cached layout areas from the most recent render pass
    pub layout: LayoutAreas,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            view: ViewTab::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            search_before_input: String::new(),
            should_quit: false,
            show_help: false,
            selected_row: 0,
            picker_cursor: 0,
            selected_node: None,
            status_message: None,
            layout: LayoutAreas::default(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.session.table().rows().len()
    }

    pub fn scroll_down(&mut self) {
        self.select_row(self.selected_row.saturating_add(1));
    }

    pub fn scroll_up(&mut self) {
        self.select_row(self.selected_row.saturating_sub(1));
    }

    pub fn page_down(&mut self, page_size: usize) {
        self.select_row(self.selected_row.saturating_add(page_size));
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.select_row(self.selected_row.saturating_sub(page_size));
    }

    pub fn jump_to_start(&mut self) {
        self.selected_row = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.select_row(usize::MAX);
    }

    fn select_row(&mut self, row: usize) {
        self.selected_row = row.min(self.row_count().saturating_sub(1));
    }

    /// Record index behind the selected table row
    pub fn selected_record(&self) -> Option<usize> {
        self.session.table().rows().get(self.selected_row).copied()
    }

    pub fn is_entering_text(&self) -> bool {
        matches!(
            self.input_mode,
            InputMode::EnteringSearch | InputMode::EnteringYear(_)
        )
    }

    pub fn is_picking(&self) -> bool {
        matches!(self.input_mode, InputMode::TagPicker | InputMode::ColumnPicker)
    }

    /// Tags in picker order: most used first
    pub fn picker_tags(&self) -> Vec<String> {
        self.session
            .catalog()
            .by_frequency()
            .into_iter()
            .map(|(tag, _)| tag.to_string())
            .collect()
    }

    fn picker_len(&self) -> usize {
        match self.input_mode {
            InputMode::TagPicker => self.session.catalog().by_frequency().len(),
            InputMode::ColumnPicker => Field::ALL.len(),
            _ => 0,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub fn active_status(&self) -> Option<&str> {
        self.status_message
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_MESSAGE_DURATION)
            .map(|(msg, _)| msg.as_str())
    }

    fn start_search_input(&mut self) {
        self.search_before_input = self.session.filter().free_text.clone();
        self.input_buffer = self.search_before_input.clone();
        self.input_mode = InputMode::EnteringSearch;
    }

    fn start_year_input(&mut self, bound: Bound) {
        self.input_buffer = self.session.year_text(bound).to_string();
        self.input_mode = InputMode::EnteringYear(bound);
    }

    /// Push the edited buffer into the session; both inputs are live.
    fn input_changed(&mut self) {
        let event = match self.input_mode {
            InputMode::EnteringSearch => SessionEvent::SetFreeText(self.input_buffer.clone()),
            InputMode::EnteringYear(bound) => SessionEvent::EditYear {
                bound,
                text: self.input_buffer.clone(),
            },
            _ => return,
        };
        self.apply_session_event(event);
    }

    fn submit_input(&mut self) {
        if let InputMode::EnteringYear(_) = self.input_mode {
            self.apply_session_event(SessionEvent::CorrectYearRange);
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    fn cancel_input(&mut self) {
        if self.input_mode == InputMode::EnteringSearch {
            let previous = std::mem::take(&mut self.search_before_input);
            self.apply_session_event(SessionEvent::SetFreeText(previous));
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    fn open_picker(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.picker_cursor = 0;
    }

    fn picker_toggle(&mut self) {
        let event = match self.input_mode {
            InputMode::TagPicker => match self.picker_tags().get(self.picker_cursor) {
                Some(tag) => SessionEvent::ToggleTag(tag.clone()),
                None => return,
            },
            InputMode::ColumnPicker => match Field::ALL.get(self.picker_cursor) {
                Some(&field) => SessionEvent::ToggleColumn(field),
                None => return,
            },
            _ => return,
        };
        self.apply_session_event(event);
    }

    fn picker_sort(&mut self, multi: bool) {
        if self.input_mode != InputMode::ColumnPicker {
            return;
        }
        if let Some(&field) = Field::ALL.get(self.picker_cursor) {
            if !chronoscope::table::column(field).sortable {
                self.set_status(format!("{} cannot be sorted", field.header()));
                return;
            }
            self.apply_session_event(SessionEvent::ToggleSort { field, multi });
        }
    }

    fn select_node(&mut self, forward: bool) {
        let count = self.session.timeline().len();
        if count == 0 {
            self.selected_node = None;
            return;
        }
        let next = match (self.selected_node, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1).min(count - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.selected_node = Some(next);
        self.apply_session_event(SessionEvent::HoverNode(Some(next)));
    }

    /// Apply a session event and keep view-local selections in range.
    pub fn apply_session_event(&mut self, event: SessionEvent) {
        let before = self.session.filtered().len();
        self.session.apply_event(event);
        self.after_session_change(before);
    }

    /// Run due session work (the delayed year correction).
    pub fn tick(&mut self, now: Instant) {
        let before = self.session.filtered().len();
        if self.session.tick(now) {
            if let InputMode::EnteringYear(bound) = self.input_mode {
                self.input_buffer = self.session.year_text(bound).to_string();
            }
            self.after_session_change(before);
        }
    }

    fn after_session_change(&mut self, filtered_before: usize) {
        self.select_row(self.selected_row);
        if self.session.filtered().len() != filtered_before {
            self.selected_node = None;
        }
        if self.session.timeline().hovered().is_none() {
            self.selected_node = None;
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Session(event) => self.apply_session_event(event),

            AppEvent::ScrollDown => self.scroll_down(),
            AppEvent::ScrollUp => self.scroll_up(),
            AppEvent::PageDown(page_size) => self.page_down(page_size),
            AppEvent::PageUp(page_size) => self.page_up(page_size),
            AppEvent::JumpToStart => self.jump_to_start(),
            AppEvent::JumpToEnd => self.jump_to_end(),

            AppEvent::SelectNextNode => self.select_node(true),
            AppEvent::SelectPrevNode => self.select_node(false),

            AppEvent::StartSearchInput => self.start_search_input(),
            AppEvent::StartYearInput(bound) => self.start_year_input(bound),
            AppEvent::InputChar(c) => {
                self.input_buffer.push(c);
                self.input_changed();
            }
            AppEvent::InputBackspace => {
                self.input_buffer.pop();
                self.input_changed();
            }
            AppEvent::InputSubmit => self.submit_input(),
            AppEvent::InputCancel => self.cancel_input(),

            AppEvent::OpenTagPicker => {
                if self.session.catalog().is_empty() {
                    self.set_status("No tags in this dataset");
                } else {
                    self.open_picker(InputMode::TagPicker);
                }
            }
            AppEvent::OpenColumnPicker => self.open_picker(InputMode::ColumnPicker),
            AppEvent::PickerUp => self.picker_cursor = self.picker_cursor.saturating_sub(1),
            AppEvent::PickerDown => {
                self.picker_cursor = (self.picker_cursor + 1).min(self.picker_len().saturating_sub(1))
            }
            AppEvent::PickerToggle => self.picker_toggle(),
            AppEvent::PickerSort { multi } => self.picker_sort(multi),
            AppEvent::PickerClose => self.input_mode = InputMode::Normal,

            AppEvent::ClearFilters => {
                self.apply_session_event(SessionEvent::SetFreeText(String::new()));
                self.apply_session_event(SessionEvent::ClearTags);
            }
            AppEvent::SwitchView => {
                self.view = match self.view {
                    ViewTab::Table => ViewTab::Timeline,
                    ViewTab::Timeline => ViewTab::Table,
                };
                self.apply_session_event(SessionEvent::PointerUp);
            }

            AppEvent::ShowHelp => self.show_help = true,
            AppEvent::HideHelp => self.show_help = false,
            AppEvent::Quit => self.should_quit = true,
        }
    }
}
