mod help;
mod picker;
mod status_bar;
mod table_view;
mod timeline_view;

use crate::app::{App, InputMode, LayoutAreas, LayoutRect, ViewTab};
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Height of the detail pane under the table or timeline
const DETAIL_PANE_HEIGHT: u16 = 8;

pub fn render(f: &mut Frame, app: &mut App) -> Result<()> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                     // Main content
            Constraint::Length(DETAIL_PANE_HEIGHT), // Selected record or node
            Constraint::Length(4),                  // Status bar (2 lines + borders)
            Constraint::Length(if app.is_entering_text() { 3 } else { 0 }), // Input prompt
        ])
        .split(f.area());

    match app.view {
        ViewTab::Table => {
            app.layout = LayoutAreas {
                table: to_layout_rect(chunks[0]),
                ..Default::default()
            };
            table_view::render_table_view(f, chunks[0], app);
            table_view::render_record_detail(f, chunks[1], app);
        }
        ViewTab::Timeline => {
            app.layout = LayoutAreas {
                timeline: to_layout_rect(chunks[0]),
                ..Default::default()
            };
            timeline_view::measure(app);
            timeline_view::render_timeline_view(f, chunks[0], app);
            timeline_view::render_node_detail(f, chunks[1], app);
        }
    }

    status_bar::render_status_bar(f, chunks[2], app);
    if app.is_entering_text() {
        status_bar::render_input_prompt(f, chunks[3], app);
    }

    match app.input_mode {
        InputMode::TagPicker => picker::render_tag_picker(f, f.area(), app),
        InputMode::ColumnPicker => picker::render_column_picker(f, f.area(), app),
        _ => {}
    }

    // Render help overlay on top of everything if active
    if app.show_help {
        help::render_help_overlay(f, f.area());
    }

    Ok(())
}

fn to_layout_rect(area: Rect) -> LayoutRect {
    LayoutRect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height,
    }
}

/// Centered popup rectangle sized as a fraction of `area`
fn popup_area(area: Rect, width_percent: f32, height_percent: f32) -> Rect {
    let popup_width = (area.width as f32 * width_percent) as u16;
    let popup_height = (area.height as f32 * height_percent) as u16;
    Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    }
}

/// Cut `text` to at most `max_width` terminal cells, marking the cut with an ellipsis.
pub(crate) fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
