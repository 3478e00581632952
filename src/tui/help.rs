use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

// Help overlay dimensions (as percentage of screen)
const HELP_POPUP_WIDTH_PERCENT: f32 = 0.6;
const HELP_POPUP_HEIGHT_PERCENT: f32 = 0.8;

fn section(title: &str) -> Line<'_> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}

pub(super) fn render_help_overlay(f: &mut Frame, area: Rect) {
    let popup_area = super::popup_area(area, HELP_POPUP_WIDTH_PERCENT, HELP_POPUP_HEIGHT_PERCENT);

    let help_lines = vec![
        Line::from(vec![Span::styled(
            "Chronoscope - Quick Reference",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        section("Filtering"),
        Line::from("  /             Search (live)"),
        Line::from("  v             Search visible columns only"),
        Line::from("  f / u         Edit from / until year"),
        Line::from("  t             Pick tags"),
        Line::from("  Esc           Clear search and tags"),
        Line::from(""),
        section("Table"),
        Line::from("  j/k, ↑/↓      Move selection"),
        Line::from("  g / G         Jump to start / end"),
        Line::from("  PageUp/Down   Scroll by page"),
        Line::from("  c             Columns (Space show/hide, s sort, S add sort key)"),
        Line::from("  0             Clear sort"),
        Line::from(""),
        section("Timeline"),
        Line::from("  h/l, ←/→      Pan"),
        Line::from("  + / -         Zoom in / out"),
        Line::from("  0             Reset pan and zoom"),
        Line::from("  n / p         Next / previous year"),
        Line::from("  Drag          Pan"),
        Line::from("  Wheel         Zoom"),
        Line::from(""),
        Line::from("  Tab           Switch table / timeline"),
        Line::from("  q / Ctrl+C    Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let help_paragraph =
        Paragraph::new(help_lines).block(Block::default().borders(Borders::ALL).title(" Help "));

    // Clear the area first to remove background content
    f.render_widget(Clear, popup_area);
    f.render_widget(help_paragraph, popup_area);
}
