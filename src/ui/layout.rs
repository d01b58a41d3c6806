//! Layout components (content area, status bar)

use crate::app::App;
use crate::state::SubmissionState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Create the main layout, reserving the bottom line for the status bar
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Key hints for the current submission state
fn get_hints(state: SubmissionState) -> &'static str {
    match state {
        SubmissionState::Editing => " Tab/S-Tab: move  Enter/^S: submit  Esc: quit ",
        SubmissionState::Submitted => " Esc: quit ",
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::styled(
        get_hints(app.engine.submission_state()),
        Style::default().fg(Color::Gray),
    )];

    if let Some(msg) = &app.status_message {
        let color = if app.engine.submission_state() == SubmissionState::Submitted {
            Color::Green
        } else {
            Color::Yellow
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(color)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);
}
