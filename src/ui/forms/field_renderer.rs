//! Field rendering utilities for forms

use crate::state::{FieldSchema, FieldState};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height of one field box
pub const FIELD_HEIGHT: u16 = 3;

/// Text shown inside the field box; secret values are masked
pub fn display_value(field: &FieldSchema, state: &FieldState) -> String {
    if field.is_secret {
        "•".repeat(state.value.chars().count())
    } else {
        state.value.clone()
    }
}

/// Draw a form field, with its error (if visible) on the bottom border
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FieldSchema,
    state: &FieldState,
    is_active: bool,
) {
    let error = state.visible_error();

    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let border_style = match (error.is_some(), is_active) {
        (true, _) => Style::default().fg(Color::Red),
        (false, true) => Style::default().fg(Color::Cyan),
        (false, false) => Style::default().fg(Color::DarkGray),
    };

    let display_value = display_value(field, state);
    let display_str = if display_value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display_value
    };

    let cursor = if is_active { "▌" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_str, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let mut block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);

    if let Some(error) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(content.block(block), area);
}
