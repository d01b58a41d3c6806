//! Signup form rendering (editing and submitted)

use super::field_renderer::{draw_field, FIELD_HEIGHT};
use crate::app::App;
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the editable form with one box per field and a submit button
pub fn draw_signup_form(frame: &mut Frame, area: Rect, app: &App) {
    let field_count = app.submit_index();

    let mut constraints: Vec<Constraint> = (0..field_count)
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Length(BUTTON_HEIGHT)); // Submit
    constraints.push(Constraint::Min(0)); // remaining space

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    let block = Block::default()
        .title(" Sign Up ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    for (idx, (field, state)) in app.engine.fields().enumerate() {
        draw_field(frame, chunks[idx], field, state, app.focus == idx);
    }

    render_button(
        frame,
        chunks[field_count],
        "Submit",
        app.focus == field_count,
        Color::Green,
    );
}

/// Draw the confirmation shown until the form resets
pub fn draw_submitted(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓ Form submitted successfully!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(at) = app.engine.submitted_at() {
        let remaining = chrono::Duration::from_std(app.engine.reset_delay())
            .ok()
            .map(|delay| (at + delay - chrono::Utc::now()).num_seconds().max(0));
        lines.push(Line::from(Span::styled(
            format!("Submitted at {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        )));
        if let Some(secs) = remaining {
            lines.push(Line::from(Span::styled(
                format!("The form will reset in {secs}s"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Sign Up ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(paragraph, area);
}
