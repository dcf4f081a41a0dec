use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::bounds::Bounds;
use crate::machine::{SimulationContext, Status};
use crate::snake::Position;

const GLYPH_SNAKE_HEAD: &str = "█";
const GLYPH_SNAKE_BODY: &str = "▓";
const GLYPH_APPLE: &str = "●";
const GLYPH_CELL: &str = "·";

/// Renders the board and status line from a snapshot of the machine.
pub fn render(frame: &mut Frame<'_>, context: &SimulationContext, status: Status) {
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let block = Block::bordered()
        .title(" snaaake ")
        .border_style(Style::new().fg(Color::DarkGray));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    if let Some((origin, _)) = context.bounds.extent() {
        render_cells(frame, inner, &context.bounds, origin);
        render_apples(frame, inner, context, origin);
        render_snake(frame, inner, context, origin);
    }

    render_status(frame, status_area, context, status);

    if let Some(banner) = banner(status) {
        render_banner(frame, inner, banner);
    }
}

fn render_cells(frame: &mut Frame<'_>, inner: Rect, bounds: &Bounds, origin: Position) {
    let buffer = frame.buffer_mut();
    for cell in bounds.iter() {
        if let Some((x, y)) = logical_to_terminal(inner, origin, *cell) {
            buffer.set_string(x, y, GLYPH_CELL, Style::new().fg(Color::DarkGray));
        }
    }
}

fn render_apples(frame: &mut Frame<'_>, inner: Rect, context: &SimulationContext, origin: Position) {
    let buffer = frame.buffer_mut();
    for apple in context.apples.iter() {
        if let Some((x, y)) = logical_to_terminal(inner, origin, *apple) {
            buffer.set_string(x, y, GLYPH_APPLE, Style::new().fg(Color::Red));
        }
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, context: &SimulationContext, origin: Position) {
    let buffer = frame.buffer_mut();
    // Tail first so the head wins if segments ever share a cell.
    for (index, segment) in context.snake.segments().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, origin, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(Color::Green));
        }
    }
}

fn render_status(frame: &mut Frame<'_>, area: Rect, context: &SimulationContext, status: Status) {
    let status_color = match status {
        Status::Dead => Color::Red,
        Status::Paused => Color::Yellow,
        Status::Idle | Status::Moving { .. } => Color::Green,
    };

    let line = Line::from(vec![
        Span::styled(format!(" {status} "), Style::new().fg(status_color)),
        Span::raw(format!(
            " length {}  apples {} ",
            context.snake.len(),
            context.apples.len()
        )),
        Span::styled(
            " [arrows/WASD] move  [space] pause/restart  [esc] reset  [q] quit",
            Style::new().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn banner(status: Status) -> Option<&'static str> {
    match status {
        Status::Idle => Some("press a direction to start"),
        Status::Paused => Some("PAUSED: space resumes, esc resets"),
        Status::Dead => Some("GAME OVER: space to restart"),
        Status::Moving { .. } => None,
    }
}

fn render_banner(frame: &mut Frame<'_>, area: Rect, text: &str) {
    let width = u16::try_from(text.width()).unwrap_or(u16::MAX).min(area.width);
    if width == 0 || area.height == 0 {
        return;
    }

    let x = area.x + (area.width - width) / 2;
    let y = area.y + area.height / 2;
    frame.render_widget(
        Paragraph::new(Line::from(text)).style(
            Style::new()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Rect::new(x, y, width, 1),
    );
}

fn logical_to_terminal(inner: Rect, origin: Position, position: Position) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(position.x - origin.x).ok()?;
    let y_offset = u16::try_from(position.y - origin.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
