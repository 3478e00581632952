//! Popup lists for choosing tags and table columns.

use crate::app::App;
use chronoscope::record::Field;
use chronoscope::table::column;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

const PICKER_WIDTH_PERCENT: f32 = 0.5;
const PICKER_HEIGHT_PERCENT: f32 = 0.7;

fn checkbox(checked: bool) -> Span<'static> {
    if checked {
        Span::styled("[x] ", Style::default().fg(Color::Green))
    } else {
        Span::raw("[ ] ")
    }
}

fn render_list(f: &mut Frame, area: Rect, title: &str, items: Vec<ListItem>, cursor: usize) {
    let popup = super::popup_area(area, PICKER_WIDTH_PERCENT, PICKER_HEIGHT_PERCENT);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default();
    state.select(Some(cursor));

    f.render_widget(Clear, popup);
    f.render_stateful_widget(list, popup, &mut state);
}

pub(super) fn render_tag_picker(f: &mut Frame, area: Rect, app: &App) {
    let catalog = app.session.catalog();
    let selected = &app.session.filter().selected_tags;
    let items: Vec<ListItem> = catalog
        .by_frequency()
        .into_iter()
        .map(|(tag, count)| {
            let mut spans = vec![
                checkbox(selected.contains(tag)),
                Span::raw(tag.to_string()),
                Span::styled(format!(" ({})", count), Style::default().fg(Color::DarkGray)),
            ];
            let related = catalog.related(tag);
            if !related.is_empty() {
                spans.push(Span::styled(
                    format!("  ~ {}", related.join(", ")),
                    Style::default().fg(Color::Blue),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    render_list(
        f,
        area,
        " Tags (Space toggle, x clear, Esc close) ",
        items,
        app.picker_cursor,
    );
}

pub(super) fn render_column_picker(f: &mut Frame, area: Rect, app: &App) {
    let visibility = app.session.visibility();
    let sort = app.session.sort();
    let items: Vec<ListItem> = Field::ALL
        .iter()
        .map(|&field| {
            let sort_mark = match sort.keys().iter().position(|k| k.field == field) {
                Some(pos) => format!(" {}{}", sort.keys()[pos].direction.arrow(), pos + 1),
                None if !column(field).sortable => " (unsortable)".to_string(),
                None => String::new(),
            };
            ListItem::new(Line::from(vec![
                checkbox(visibility.is_visible(field)),
                Span::raw(field.header()),
                Span::styled(sort_mark, Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    render_list(
        f,
        area,
        " Columns (Space show/hide, s sort, S add sort key, Esc close) ",
        items,
        app.picker_cursor,
    );
}
