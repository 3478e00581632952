//! Plain-text output for the `table`, `timeline` and `tags` subcommands.
//!
//! Each command builds the same [`Session`] the viewer uses, replays the
//! command-line filters into it as events, and prints the derived view.

use crate::cli::{QueryArgs, TagsArgs};
use crate::tui::truncate_to_width;
use anyhow::Result;
use chronoscope::config::Config;
use chronoscope::dataset::{self, TagCatalog};
use chronoscope::event::SessionEvent;
use chronoscope::session::{Session, SessionOptions};
use chronoscope::table::{render_cell, SortState, TableView, VisibilityState};
use chronoscope::year_range::Bound;
use colored::Colorize;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Widest a column may get before its cells are truncated.
const MAX_COLUMN_WIDTH: usize = 40;
const COLUMN_SEPARATOR: &str = "  ";

fn report(result: Result<()>) -> Result<(), i32> {
    result.map_err(|e| {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        1
    })
}

/// Session with the command-line filters applied.
fn query_session(args: &QueryArgs, config: &Config) -> Result<Session> {
    let records = dataset::load_events(&args.events)?;
    let options = SessionOptions {
        visibility: match &args.columns {
            Some(columns) => VisibilityState::only(columns),
            None => config.visibility(),
        },
        sort: match &args.sort {
            Some(keys) => SortState::new(keys.clone()),
            None => config.sort_state(),
        },
        year_debounce: config.year_debounce,
        ..SessionOptions::default()
    };
    let mut session = Session::new(records, options);

    let mut events = Vec::new();
    if let Some(search) = &args.search {
        events.push(SessionEvent::SetFreeText(search.clone()));
    }
    if args.visible_only {
        events.push(SessionEvent::ToggleFreeTextVisibleOnly);
    }
    for (bound, text) in [(Bound::From, &args.from), (Bound::Until, &args.until)] {
        if let Some(text) = text {
            events.push(SessionEvent::EditYear {
                bound,
                text: text.clone(),
            });
        }
    }
    if args.from.is_some() || args.until.is_some() {
        events.push(SessionEvent::CorrectYearRange);
    }
    events.extend(args.tags.iter().cloned().map(SessionEvent::ToggleTag));

    for event in events {
        session.apply_event(event);
    }
    tracing::debug!(matched = session.filtered().len(), "query applied");
    Ok(session)
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Header line followed by one line per row, columns aligned.
fn table_lines(session: &Session) -> Option<Vec<String>> {
    let TableView::Rows { columns, rows } = session.table() else {
        return None;
    };

    let mut grid: Vec<Vec<String>> = vec![columns.iter().map(|f| f.header().to_string()).collect()];
    for record in rows.iter().filter_map(|&i| session.record(i)) {
        grid.push(
            columns
                .iter()
                .map(|&field| truncate_to_width(&render_cell(record, field).plain(), MAX_COLUMN_WIDTH))
                .collect(),
        );
    }

    let widths: Vec<usize> = (0..columns.len())
        .map(|c| grid.iter().map(|row| row[c].width()).max().unwrap_or(0))
        .collect();

    let lines = grid
        .iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| pad(cell, w))
                .collect();
            cells.join(COLUMN_SEPARATOR).trim_end().to_string()
        })
        .collect();
    Some(lines)
}

fn timeline_lines(session: &Session) -> Vec<String> {
    let nodes = session.timeline().nodes();
    let mut lines = Vec::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            let skipped = node.year - nodes[i - 1].year - 1;
            if skipped > 0 {
                lines.push(format!(
                    "      ┆ {} year{}",
                    skipped,
                    if skipped == 1 { "" } else { "s" }
                ));
            }
        }
        let tags = if node.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", node.tags.join(", "))
        };
        lines.push(format!("{:>5} ● {}{}", node.year, node.title, tags));
    }
    lines
}

fn tag_lines(catalog: &TagCatalog) -> Vec<String> {
    let entries = catalog.by_frequency();
    let width = entries.iter().map(|(tag, _)| tag.width()).max().unwrap_or(0);
    entries
        .into_iter()
        .map(|(tag, count)| {
            let related = catalog.related(tag);
            let mut line = format!("{}  {:>4}", pad(tag, width), count);
            if !related.is_empty() {
                line.push_str(&format!("  ~ {}", related.join(", ")));
            }
            line
        })
        .collect()
}

pub fn table(args: &QueryArgs, config: &Config) -> Result<(), i32> {
    report(query_session(args, config).map(|session| {
        match session.table() {
            TableView::NothingVisible => {
                println!("{}", "No columns are visible.".dimmed());
            }
            TableView::Empty { .. } => {
                println!("{}", "No records match the current filters.".dimmed());
            }
            TableView::Rows { .. } => {
                let lines = table_lines(&session).unwrap_or_default();
                let mut iter = lines.into_iter();
                if let Some(header) = iter.next() {
                    println!("{}", header.bold());
                }
                for line in iter {
                    println!("{}", line);
                }
            }
        }
    }))
}

pub fn timeline(args: &QueryArgs, config: &Config) -> Result<(), i32> {
    report(query_session(args, config).map(|session| {
        let lines = timeline_lines(&session);
        if lines.is_empty() {
            println!("{}", "No dated records match the current filters.".dimmed());
        }
        for line in lines {
            println!("{}", line);
        }
    }))
}

fn print_tags(args: &TagsArgs, tags_file: Option<&Path>) -> Result<()> {
    let records = dataset::load_events(&args.events)?;
    let mut catalog = TagCatalog::from_records(&records);
    if let Some(path) = tags_file {
        catalog = catalog.with_details(dataset::load_tags(path)?);
    }
    if catalog.is_empty() {
        println!("{}", "(no tags)".dimmed());
    }
    for line in tag_lines(&catalog) {
        println!("{}", line);
    }
    Ok(())
}

pub fn tags(args: &TagsArgs, tags_file: Option<&Path>) -> Result<(), i32> {
    report(print_tags(args, tags_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronoscope::record::Field;
    use chronoscope::table::{SortDirection, SortKey};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EVENTS: &str = r#"{
        "events": [
            {"year": 1610, "title": "Sidereus Nuncius", "author": "galileo", "tags": ["astronomy"]},
            {"year": 1610, "title": "Dissertatio", "author": "kepler", "tags": ["astronomy", "optics"]},
            {"year": 1604, "title": "Astronomiae Pars Optica", "author": "kepler", "tags": ["optics"]},
            {"year": 1687, "title": "Principia", "author": "newton", "tags": ["physics"]},
            {"title": "Undated letter", "author": "anonymous"}
        ]
    }"#;

    fn events_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EVENTS.as_bytes()).unwrap();
        file
    }

    fn args(file: &NamedTempFile) -> QueryArgs {
        QueryArgs {
            events: file.path().to_path_buf(),
            search: None,
            visible_only: false,
            from: None,
            until: None,
            tags: Vec::new(),
            columns: Some(vec![Field::Year, Field::Author]),
            sort: None,
        }
    }

    #[test]
    fn test_table_lines_align_columns() {
        let file = events_file();
        let session = query_session(&args(&file), &Config::default()).unwrap();
        let lines = table_lines(&session).unwrap();
        assert_eq!(lines[0], "Year  Author");
        // year descending, undated last
        assert_eq!(lines[1], "1687  Newton");
        assert_eq!(lines.last().unwrap(), "      Anonymous");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_query_applies_filters() {
        let file = events_file();
        let mut query = args(&file);
        query.tags = vec!["optics".to_string()];
        query.until = Some("1605".to_string());
        let session = query_session(&query, &Config::default()).unwrap();
        // the undated record bypasses the year bound but has no tags
        assert_eq!(session.filtered(), &[2]);

        let mut query = args(&file);
        query.search = Some("kepler".to_string());
        query.sort = Some(vec![SortKey::new(Field::Year, SortDirection::Ascending)]);
        let session = query_session(&query, &Config::default()).unwrap();
        assert_eq!(session.table().rows(), &[2, 1]);
    }

    #[test]
    fn test_nothing_visible_has_no_lines() {
        let file = events_file();
        let mut query = args(&file);
        query.columns = Some(Vec::new());
        let session = query_session(&query, &Config::default()).unwrap();
        assert!(table_lines(&session).is_none());
    }

    #[test]
    fn test_timeline_lines_mark_gaps() {
        let file = events_file();
        let session = query_session(&args(&file), &Config::default()).unwrap();
        let lines = timeline_lines(&session);
        assert_eq!(lines[0], " 1604 ● Astronomiae Pars Optica  [optics]");
        assert_eq!(lines[1], "      ┆ 5 years");
        assert_eq!(
            lines[2],
            " 1610 ● Sidereus Nuncius +1 more...  [astronomy, optics]"
        );
        assert_eq!(lines[3], "      ┆ 76 years");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_tag_lines_by_frequency() {
        let file = events_file();
        let records = dataset::load_events(file.path()).unwrap();
        let lines = tag_lines(&TagCatalog::from_records(&records));
        assert_eq!(lines[0], "astronomy     2");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_missing_events_file_is_an_error() {
        let mut query = args(&events_file());
        query.events = "/nonexistent/events.json".into();
        assert!(query_session(&query, &Config::default()).is_err());
    }
}
