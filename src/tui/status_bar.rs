use crate::app::{App, InputMode, ViewTab};
use chronoscope::year_range::Bound;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Summary of the active filters and sort, for the first status line.
fn status_text(app: &App) -> String {
    let session = &app.session;
    let filter = session.filter();
    let mut parts = vec![format!(
        " Records {}/{}",
        session.filtered().len(),
        session.records().len()
    )];

    let from = session.year_text(Bound::From);
    let until = session.year_text(Bound::Until);
    if !from.is_empty() || !until.is_empty() {
        let pending = if session.year_input().correction_pending() {
            "*"
        } else {
            ""
        };
        parts.push(format!("Years {}–{}{}", from, until, pending));
    }

    if !filter.free_text.is_empty() {
        let scope = if filter.free_text_visible_only {
            " (visible)"
        } else {
            ""
        };
        parts.push(format!("Search \"{}\"{}", filter.free_text, scope));
    }

    if !filter.selected_tags.is_empty() {
        let tags: Vec<&str> = filter.selected_tags.iter().map(String::as_str).collect();
        parts.push(format!("Tags {}", tags.join(", ")));
    }

    match app.view {
        ViewTab::Table => {
            let keys: Vec<String> = session
                .sort()
                .keys()
                .iter()
                .map(|k| format!("{}{}", k.field.name(), k.direction.arrow()))
                .collect();
            if !keys.is_empty() {
                parts.push(format!("Sort {}", keys.join(" ")));
            }
        }
        ViewTab::Timeline => {
            let t = session.viewport().transform();
            parts.push(format!(
                "Years shown {} | Zoom {:.0}%",
                session.timeline().len(),
                t.scale * 100.0
            ));
        }
    }

    parts.join(" | ")
}

pub(super) fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_line = if let Some(msg) = app.active_status() {
        Line::from(vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(Color::Green),
        )])
    } else {
        let help_text = match app.view {
            ViewTab::Table => {
                " q - Quit | Tab - Timeline | / - Search | f/u - Years | t - Tags | c - Columns | ? - Help"
            }
            ViewTab::Timeline => {
                " q - Quit | Tab - Table | h/l - Pan | +/- - Zoom | n/p - Select year | ? - Help"
            }
        };
        Line::from(vec![Span::styled(
            help_text,
            Style::default().fg(Color::DarkGray),
        )])
    };

    let title = match app.view {
        ViewTab::Table => "Table",
        ViewTab::Timeline => "Timeline",
    };

    let status_lines = vec![
        Line::from(vec![Span::styled(
            status_text(app),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        bottom_line,
    ];

    let paragraph =
        Paragraph::new(status_lines).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(paragraph, area);
}

pub(super) fn render_input_prompt(f: &mut Frame, area: Rect, app: &App) {
    let (label, title, color) = match app.input_mode {
        InputMode::EnteringSearch => (
            "Search",
            "Search (live, Enter to close, Esc to restore)",
            Color::Yellow,
        ),
        InputMode::EnteringYear(Bound::From) => (
            "From",
            "From year (Enter to apply, Esc to close)",
            Color::Cyan,
        ),
        InputMode::EnteringYear(Bound::Until) => (
            "Until",
            "Until year (Enter to apply, Esc to close)",
            Color::Cyan,
        ),
        _ => return,
    };
    let input_text = format!("{}: {}", label, app.input_buffer);

    let input = Paragraph::new(input_text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(input, area);

    // Cursor sits after the typed text (label + ": " + input)
    let cursor_offset = (label.len() + 2 + app.input_buffer.width()) as u16;
    f.set_cursor_position((area.x + 1 + cursor_offset, area.y + 1));
}
