use chronoscope::event::SessionEvent;
use chronoscope::year_range::Bound;

/// Events that can occur in the application
/// Handlers return these events instead of mutating app state directly
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Forwarded to the session reducer
    Session(SessionEvent),

    // Table navigation
    ScrollDown,
    ScrollUp,
    PageDown(usize), // page size
    PageUp(usize),
    JumpToStart,
    JumpToEnd,

    // Timeline navigation
    SelectNextNode,
    SelectPrevNode,

    // Text input (search and year bounds)
    StartSearchInput,
    StartYearInput(Bound),
    InputChar(char),
    InputBackspace,
    InputSubmit,
    InputCancel,

    // Pickers
    OpenTagPicker,
    OpenColumnPicker,
    PickerUp,
    PickerDown,
    PickerToggle,
    PickerSort { multi: bool },
    PickerClose,

    ClearFilters,
    SwitchView,

    // Help mode
    ShowHelp,
    HideHelp,

    Quit,
}

impl From<SessionEvent> for AppEvent {
    fn from(event: SessionEvent) -> Self {
        AppEvent::Session(event)
    }
}
