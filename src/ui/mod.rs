//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use crate::state::SubmissionState;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let main_area = layout::create_layout(frame.area());

    match app.engine.submission_state() {
        SubmissionState::Editing => forms::draw_signup_form(frame, main_area, app),
        SubmissionState::Submitted => forms::draw_submitted(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);
}
