//! Terminal timeline: nodes on a horizontal axis with alternating labels.
//!
//! The terminal is the measuring presentation. Each frame the logical slots
//! are scaled and snapped to whole cells, and the resulting marker boxes are
//! reported back to the session before drawing. Box positions are relative
//! to the axis row and exclude the pan offset, which is applied when drawing.

use crate::app::App;
use chronoscope::event::SessionEvent;
use chronoscope::timeline::{LabelPlacement, NodeBox, TimelineLayout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Marker boxes for every node at `scale`, snapped to cells.
fn snapped_boxes(timeline: &TimelineLayout, scale: f64) -> Vec<NodeBox> {
    let width = (timeline.params().node_width * scale).round().max(1.0);
    timeline
        .slots()
        .iter()
        .map(|slot| NodeBox {
            x: (slot.x * scale).round(),
            y: 0.0,
            width,
            height: 1.0,
        })
        .collect()
}

/// Sync the viewport width and report marker boxes that moved.
pub(super) fn measure(app: &mut App) {
    let width = f64::from(app.layout.timeline.inner_width());
    if app.session.viewport().viewport_width() != width {
        app.apply_session_event(SessionEvent::ResizeViewport(width));
    }

    let scale = app.session.viewport().transform().scale;
    let timeline = app.session.timeline();
    let changed: Vec<(usize, NodeBox)> = snapped_boxes(timeline, scale)
        .into_iter()
        .enumerate()
        .filter(|(index, marker)| timeline.measured(*index) != Some(*marker))
        .collect();
    for (index, marker) in changed {
        app.apply_session_event(SessionEvent::NodeMeasured { index, marker });
    }
}

/// Write `text` starting at fractional column `col`, dropping cells outside `inner`.
fn put_clipped(buf: &mut Buffer, inner: Rect, col: f64, row: f64, text: &str, style: Style) {
    let row = row.round() as i64;
    if row < i64::from(inner.y) || row >= i64::from(inner.bottom()) {
        return;
    }
    let left = i64::from(inner.x);
    let right = i64::from(inner.right());
    let mut x = col.round() as i64;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0) as i64;
        if w == 0 {
            continue;
        }
        if x >= right {
            break;
        }
        if x >= left && x + w <= right {
            buf.set_string(x as u16, row as u16, ch.to_string(), style);
        }
        x += w;
    }
}

/// Part of the axis `[origin, origin + content_end)` that lands inside `inner`,
/// as a start column and a cell count.
fn axis_span(origin: f64, content_end: f64, inner: Rect) -> Option<(f64, usize)> {
    let start = origin.max(f64::from(inner.x));
    let end = (origin + content_end).min(f64::from(inner.right()));
    if end <= start {
        return None;
    }
    Some((start, (end - start).round() as usize))
}

fn draw_axis(buf: &mut Buffer, inner: Rect, origin: f64, row: f64, content_end: f64) {
    if let Some((start, cells)) = axis_span(origin, content_end, inner) {
        let axis = "─".repeat(cells);
        put_clipped(buf, inner, start, row, &axis, Style::default().fg(Color::DarkGray));
    }
}

pub(super) fn render_timeline_view(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let timeline = session.timeline();
    let block = Block::default().borders(Borders::ALL).title(" Timeline ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if timeline.is_empty() {
        let message = Paragraph::new(Span::styled(
            " No dated records match the current filters.",
            Style::default().fg(Color::DarkGray),
        ));
        f.render_widget(message, inner);
        return;
    }

    let transform = session.viewport().transform();
    let axis_row = f64::from(inner.y + inner.height / 2);
    // screen column of a measured (scaled) x
    let origin = f64::from(inner.x) + transform.offset_x;
    let buf = f.buffer_mut();

    let content_end = (timeline.content_width() * transform.scale).round();
    draw_axis(buf, inner, origin, axis_row, content_end);

    for resolved in timeline.resolve_all() {
        let Some(node) = timeline.node(resolved.index) else {
            continue;
        };
        let hovered = resolved.tooltip.is_some();

        let marker_style = if hovered {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let marker = if node.count() > 1 { "◆" } else { "●" };
        put_clipped(
            buf,
            inner,
            origin + resolved.marker.x,
            axis_row + resolved.marker.y,
            marker,
            marker_style,
        );

        put_clipped(
            buf,
            inner,
            origin + resolved.connector.x,
            axis_row + resolved.connector.y,
            "│",
            Style::default().fg(Color::DarkGray),
        );

        let room = timeline
            .label_room(resolved.index)
            .unwrap_or_else(|| f64::from(inner.right()) - (origin + resolved.label.x));
        let label = super::truncate_to_width(&node.title, room.max(0.0) as usize);
        let label_style = match (hovered, resolved.placement) {
            (true, _) => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            (false, LabelPlacement::Above) => Style::default(),
            (false, LabelPlacement::Below) => Style::default().fg(Color::Gray),
        };
        put_clipped(
            buf,
            inner,
            origin + resolved.label.x,
            axis_row + resolved.label.y,
            &label,
            label_style,
        );

        if let Some(tooltip) = resolved.tooltip {
            put_clipped(
                buf,
                inner,
                origin + tooltip.x,
                axis_row + tooltip.y,
                &format!(" {} ", node.year),
                Style::default().add_modifier(Modifier::REVERSED),
            );
        }
    }
}

pub(super) fn render_node_detail(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let timeline = session.timeline();
    let block = Block::default().borders(Borders::ALL).title(" Year ");

    let Some(node) = timeline.hovered().and_then(|i| timeline.node(i)) else {
        let hint = Paragraph::new(Span::styled(
            " Hover a year or press n/p to inspect it",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(hint, area);
        return;
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{}", node.year),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  {} event{}",
            node.count(),
            if node.count() == 1 { "" } else { "s" }
        )),
        Span::styled(
            format!("  {}", node.tags.join(", ")),
            Style::default().fg(Color::Magenta),
        ),
    ])];
    for record in node.members.iter().filter_map(|&i| session.record(i)) {
        lines.push(Line::from(format!("  • {}", record.title)));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
