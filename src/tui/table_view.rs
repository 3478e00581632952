use crate::app::App;
use chronoscope::record::{EventRecord, Field};
use chronoscope::table::{render_cell, Cell, SortState, TableView};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

/// Borders plus the header row
const TABLE_CHROME_HEIGHT: u16 = 3;
const YEAR_COLUMN_WIDTH: u16 = 7;

fn header_label(field: Field, sort: &SortState) -> String {
    let keys = sort.keys();
    match keys.iter().position(|k| k.field == field) {
        Some(pos) if keys.len() > 1 => {
            format!("{} {}{}", field.header(), keys[pos].direction.arrow(), pos + 1)
        }
        Some(pos) => format!("{} {}", field.header(), keys[pos].direction.arrow()),
        None => field.header().to_string(),
    }
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::UNDERLINED)
}

/// Terminal rendering of one cell on a single line.
fn cell_line(cell: Cell) -> Line<'static> {
    match cell {
        Cell::Blank => Line::from(""),
        Cell::Text(text) => Line::from(text),
        Cell::Lines(lines) => Line::from(lines.join(" / ")),
        Cell::Tags(tags) => {
            let mut spans = Vec::with_capacity(tags.len() * 2);
            for (i, tag) in tags.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(", "));
                }
                spans.push(Span::styled(tag, Style::default().fg(Color::Magenta)));
            }
            Line::from(spans)
        }
        Cell::Sources(sources) => {
            let mut spans = Vec::with_capacity(sources.len() * 2);
            for (i, source) in sources.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" ; "));
                }
                let style = if source.is_link {
                    link_style()
                } else {
                    Style::default()
                };
                spans.push(Span::styled(source.text, style));
            }
            Line::from(spans)
        }
    }
}

fn column_width(field: Field) -> Constraint {
    match field {
        Field::Year => Constraint::Length(YEAR_COLUMN_WIDTH),
        Field::Details | Field::Sources => Constraint::Fill(2),
        _ => Constraint::Fill(1),
    }
}

fn placeholder(f: &mut Frame, area: Rect, block: Block, message: &str) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::DarkGray),
    )))
    .block(block);
    f.render_widget(paragraph, area);
}

/// First row to draw so that `selected` stays inside a window of `height` rows.
fn window_start(selected: usize, height: usize) -> usize {
    if height == 0 {
        return selected;
    }
    (selected + 1).saturating_sub(height)
}

pub(super) fn render_table_view(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let block = Block::default().borders(Borders::ALL).title(" Records ");

    let (columns, rows) = match session.table() {
        TableView::NothingVisible => {
            placeholder(
                f,
                area,
                block,
                " No columns are visible. Press c to choose columns.",
            );
            return;
        }
        TableView::Empty { columns } => (columns.as_slice(), &[][..]),
        TableView::Rows { columns, rows } => (columns.as_slice(), rows.as_slice()),
    };

    let header = Row::new(
        columns
            .iter()
            .map(|&field| header_label(field, session.sort()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));
    let widths: Vec<Constraint> = columns.iter().map(|&f| column_width(f)).collect();

    if rows.is_empty() {
        let table = Table::new(vec![Row::new(vec![Line::from(Span::styled(
            "No records match the current filters.",
            Style::default().fg(Color::DarkGray),
        ))])], widths)
        .header(header)
        .block(block);
        f.render_widget(table, area);
        return;
    }

    let visible_height = area.height.saturating_sub(TABLE_CHROME_HEIGHT) as usize;
    let start = window_start(app.selected_row, visible_height);
    let end = (start + visible_height.max(1)).min(rows.len());

    let table_rows: Vec<Row> = rows[start..end]
        .iter()
        .filter_map(|&idx| session.record(idx))
        .map(|record| {
            Row::new(
                columns
                    .iter()
                    .map(|&field| cell_line(render_cell(record, field)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default();
    state.select(Some(app.selected_row.saturating_sub(start)));
    f.render_stateful_widget(table, area, &mut state);
}

fn detail_lines(record: &EventRecord) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut heading = vec![];
    if let Some(year) = record.year {
        heading.push(Span::styled(
            format!("{}  ", year),
            Style::default().fg(Color::Yellow),
        ));
    }
    heading.push(Span::styled(
        record.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    if record.publication {
        heading.push(Span::styled(
            "  [publication]",
            Style::default().fg(Color::Green),
        ));
    }
    lines.push(Line::from(heading));

    for field in [
        Field::Author,
        Field::City,
        Field::Language,
        Field::Individuals,
        Field::Tags,
        Field::Sources,
    ] {
        let cell = render_cell(record, field);
        if cell == Cell::Blank {
            continue;
        }
        let mut spans = vec![Span::styled(
            format!("{}: ", field.header()),
            Style::default().fg(Color::Cyan),
        )];
        spans.extend(cell_line(cell).spans);
        lines.push(Line::from(spans));
    }
    for detail in &record.details {
        lines.push(Line::from(format!("  {}", detail)));
    }
    lines
}

pub(super) fn render_record_detail(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Record ");
    let Some(record) = app.selected_record().and_then(|idx| app.session.record(idx)) else {
        placeholder(f, area, block, " Nothing selected");
        return;
    };
    let paragraph = Paragraph::new(detail_lines(record))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
