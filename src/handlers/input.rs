use crate::app::{App, AppEvent, InputMode, ViewTab};
use chronoscope::event::SessionEvent;
use chronoscope::year_range::Bound;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Cells moved per keyboard pan step
const PAN_STEP: f64 = 8.0;

/// Handle keyboard input and return corresponding events
/// Does not mutate app state directly - returns events to be processed
pub fn handle_input_event(key: KeyEvent, app: &App) -> Vec<AppEvent> {
    // If help is showing, most keys just hide help (except quit)
    if app.show_help {
        return handle_help_mode(key);
    }

    match app.input_mode {
        InputMode::EnteringSearch => handle_text_input_mode(key, false),
        InputMode::EnteringYear(_) => handle_text_input_mode(key, true),
        InputMode::TagPicker | InputMode::ColumnPicker => handle_picker_mode(key),
        InputMode::Normal => match app.view {
            ViewTab::Table => handle_table_mode(key),
            ViewTab::Timeline => handle_timeline_mode(key),
        },
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Handle keyboard input when help overlay is showing
fn handle_help_mode(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Char('q') => vec![AppEvent::Quit],
        _ if is_quit(&key) => vec![AppEvent::Quit],
        // Any other key hides help
        _ => vec![AppEvent::HideHelp],
    }
}

/// Handle keyboard input while typing a search or a year bound
fn handle_text_input_mode(key: KeyEvent, digits_only: bool) -> Vec<AppEvent> {
    if is_quit(&key) {
        return vec![AppEvent::Quit];
    }
    match key.code {
        KeyCode::Char(c) if digits_only && !(c.is_ascii_digit() || c == '-') => vec![],
        KeyCode::Char(c) => vec![AppEvent::InputChar(c)],
        KeyCode::Backspace => vec![AppEvent::InputBackspace],
        KeyCode::Enter => vec![AppEvent::InputSubmit],
        KeyCode::Esc => vec![AppEvent::InputCancel],
        _ => vec![],
    }
}

/// Handle keyboard input in the tag and column pickers
fn handle_picker_mode(key: KeyEvent) -> Vec<AppEvent> {
    if is_quit(&key) {
        return vec![AppEvent::Quit];
    }
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => vec![AppEvent::PickerDown],
        KeyCode::Up | KeyCode::Char('k') => vec![AppEvent::PickerUp],
        KeyCode::Char(' ') | KeyCode::Enter => vec![AppEvent::PickerToggle],
        KeyCode::Char('s') => vec![AppEvent::PickerSort { multi: false }],
        KeyCode::Char('S') => vec![AppEvent::PickerSort { multi: true }],
        KeyCode::Char('x') => vec![SessionEvent::ClearTags.into()],
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('t') | KeyCode::Char('c') => {
            vec![AppEvent::PickerClose]
        }
        _ => vec![],
    }
}

/// Keys shared by both views
fn handle_common(key: &KeyEvent) -> Option<Vec<AppEvent>> {
    if is_quit(key) {
        return Some(vec![AppEvent::Quit]);
    }
    let events = match key.code {
        KeyCode::Char('q') => vec![AppEvent::Quit],
        KeyCode::Tab => vec![AppEvent::SwitchView],
        KeyCode::Char('/') => vec![AppEvent::StartSearchInput],
        KeyCode::Char('f') => vec![AppEvent::StartYearInput(Bound::From)],
        KeyCode::Char('u') => vec![AppEvent::StartYearInput(Bound::Until)],
        KeyCode::Char('t') => vec![AppEvent::OpenTagPicker],
        KeyCode::Char('c') => vec![AppEvent::OpenColumnPicker],
        KeyCode::Char('v') => vec![SessionEvent::ToggleFreeTextVisibleOnly.into()],
        KeyCode::Char('?') => vec![AppEvent::ShowHelp],
        KeyCode::Esc => vec![AppEvent::ClearFilters],
        _ => return None,
    };
    Some(events)
}

/// Handle keyboard input while the table is shown
fn handle_table_mode(key: KeyEvent) -> Vec<AppEvent> {
    if let Some(events) = handle_common(&key) {
        return events;
    }
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => vec![AppEvent::ScrollDown],
        KeyCode::Up | KeyCode::Char('k') => vec![AppEvent::ScrollUp],
        // Page size will be set by caller based on terminal size
        KeyCode::PageDown | KeyCode::PageUp => vec![],
        KeyCode::Char('g') | KeyCode::Home => vec![AppEvent::JumpToStart],
        KeyCode::Char('G') | KeyCode::End => vec![AppEvent::JumpToEnd],
        KeyCode::Char('0') => vec![SessionEvent::ClearSort.into()],
        _ => vec![],
    }
}

/// Handle keyboard input while the timeline is shown
fn handle_timeline_mode(key: KeyEvent) -> Vec<AppEvent> {
    if let Some(events) = handle_common(&key) {
        return events;
    }
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => vec![SessionEvent::PanBy(PAN_STEP).into()],
        KeyCode::Right | KeyCode::Char('l') => vec![SessionEvent::PanBy(-PAN_STEP).into()],
        KeyCode::Char('+') | KeyCode::Char('=') => vec![SessionEvent::ZoomIn.into()],
        KeyCode::Char('-') => vec![SessionEvent::ZoomOut.into()],
        KeyCode::Char('0') => vec![SessionEvent::ResetView.into()],
        KeyCode::Char('n') | KeyCode::Char(']') => vec![AppEvent::SelectNextNode],
        KeyCode::Char('p') | KeyCode::Char('[') => vec![AppEvent::SelectPrevNode],
        _ => vec![],
    }
}

/// Handle mouse input, resolving positions against the last rendered layout
pub fn handle_mouse_event(mouse: MouseEvent, app: &App) -> Vec<AppEvent> {
    if app.show_help || app.input_mode != InputMode::Normal {
        return vec![];
    }
    match app.view {
        ViewTab::Table => match mouse.kind {
            MouseEventKind::ScrollDown => vec![AppEvent::ScrollDown; 3],
            MouseEventKind::ScrollUp => vec![AppEvent::ScrollUp; 3],
            _ => vec![],
        },
        ViewTab::Timeline => handle_timeline_mouse(mouse, app),
    }
}

fn handle_timeline_mouse(mouse: MouseEvent, app: &App) -> Vec<AppEvent> {
    let area = app.layout.timeline;
    let inside = area.contains_inner(mouse.column, mouse.row);
    let x = area.inner_column(mouse.column);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if inside => {
            vec![SessionEvent::PointerDown(x).into()]
        }
        // Drags continue outside the area; release ends them anywhere
        MouseEventKind::Drag(MouseButton::Left) => vec![SessionEvent::PointerMove(x).into()],
        MouseEventKind::Up(MouseButton::Left) => vec![SessionEvent::PointerUp.into()],
        MouseEventKind::Moved => {
            let hover = inside.then_some(x);
            vec![SessionEvent::HoverAt(hover).into()]
        }
        MouseEventKind::ScrollDown if inside => vec![SessionEvent::Wheel(1.0).into()],
        MouseEventKind::ScrollUp if inside => vec![SessionEvent::Wheel(-1.0).into()],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LayoutRect;
    use chronoscope::record::EventRecord;
    use chronoscope::session::{Session, SessionOptions};
    use crossterm::event::KeyEventState;

    fn app() -> App {
        let records = vec![EventRecord {
            year: Some(1600),
            title: "Alpha".to_string(),
            ..Default::default()
        }];
        App::new(Session::new(records, SessionOptions::default()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_quit_on_q() {
        let app = app();
        assert_eq!(handle_input_event(key(KeyCode::Char('q')), &app), vec![AppEvent::Quit]);
    }

    #[test]
    fn test_quit_on_ctrl_c_while_typing() {
        let mut app = app();
        app.input_mode = InputMode::EnteringSearch;
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_input_event(key, &app), vec![AppEvent::Quit]);
    }

    #[test]
    fn test_table_navigation() {
        let app = app();
        assert_eq!(handle_input_event(key(KeyCode::Char('j')), &app), vec![AppEvent::ScrollDown]);
        assert_eq!(handle_input_event(key(KeyCode::Up), &app), vec![AppEvent::ScrollUp]);
        assert_eq!(handle_input_event(key(KeyCode::Char('G')), &app), vec![AppEvent::JumpToEnd]);
    }

    #[test]
    fn test_search_keys_become_input() {
        let mut app = app();
        assert_eq!(
            handle_input_event(key(KeyCode::Char('/')), &app),
            vec![AppEvent::StartSearchInput]
        );
        app.input_mode = InputMode::EnteringSearch;
        assert_eq!(
            handle_input_event(key(KeyCode::Char('q')), &app),
            vec![AppEvent::InputChar('q')]
        );
        assert_eq!(handle_input_event(key(KeyCode::Esc), &app), vec![AppEvent::InputCancel]);
    }

    #[test]
    fn test_year_input_ignores_letters() {
        let mut app = app();
        app.input_mode = InputMode::EnteringYear(Bound::From);
        assert!(handle_input_event(key(KeyCode::Char('x')), &app).is_empty());
        assert_eq!(
            handle_input_event(key(KeyCode::Char('7')), &app),
            vec![AppEvent::InputChar('7')]
        );
    }

    #[test]
    fn test_timeline_keys() {
        let mut app = app();
        app.view = ViewTab::Timeline;
        assert_eq!(
            handle_input_event(key(KeyCode::Right), &app),
            vec![AppEvent::Session(SessionEvent::PanBy(-PAN_STEP))]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Char('+')), &app),
            vec![AppEvent::Session(SessionEvent::ZoomIn)]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Char('n')), &app),
            vec![AppEvent::SelectNextNode]
        );
    }

    #[test]
    fn test_help_hides_on_any_key() {
        let mut app = app();
        app.show_help = true;
        let event = KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_input_event(event, &app), vec![AppEvent::HideHelp]);
    }

    #[test]
    fn test_timeline_drag_maps_to_inner_columns() {
        let mut app = app();
        app.view = ViewTab::Timeline;
        app.layout.timeline = LayoutRect {
            x: 10,
            y: 5,
            width: 50,
            height: 10,
        };
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 21, 8), &app),
            vec![AppEvent::Session(SessionEvent::PointerDown(10.0))]
        );
        // press outside the axis does not start a drag
        assert!(handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 2, 2), &app).is_empty());
        // release outside still ends it
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), &app),
            vec![AppEvent::Session(SessionEvent::PointerUp)]
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Moved, 0, 0), &app),
            vec![AppEvent::Session(SessionEvent::HoverAt(None))]
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollDown, 20, 8), &app),
            vec![AppEvent::Session(SessionEvent::Wheel(1.0))]
        );
    }

    #[test]
    fn test_table_wheel_scrolls_rows() {
        let app = app();
        let events = handle_mouse_event(mouse(MouseEventKind::ScrollDown, 0, 0), &app);
        assert_eq!(events, vec![AppEvent::ScrollDown; 3]);
    }
}
