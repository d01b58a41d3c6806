//! Application state and core logic

use crate::config::FormConfig;
use crate::scheduler::{ResetTicket, TokioScheduler};
use crate::state::{FormEngine, FormSchema, SubmissionState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedReceiver;

/// Main application struct
pub struct App {
    /// Form state, the only place field values live
    pub engine: FormEngine<TokioScheduler>,
    /// Fired reset timers waiting to be handled
    resets: UnboundedReceiver<ResetTicket>,
    /// Field names in display order
    field_names: Vec<String>,
    /// Focused row: one per field, then the submit button
    pub focus: usize,
    /// Whether the app should quit
    quit: bool,
    /// Feedback shown in the status bar
    pub status_message: Option<String>,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &FormConfig) -> Result<Self> {
        let schema = FormSchema::signup()?;
        let (scheduler, resets) = TokioScheduler::channel();
        let engine = FormEngine::new(schema, scheduler, config.engine_options());
        let field_names = engine
            .fields()
            .map(|(schema, _)| schema.name.clone())
            .collect();

        Ok(Self {
            engine,
            resets,
            field_names,
            focus: 0,
            quit: false,
            status_message: None,
        })
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Index of the submit button in the focus order
    pub fn submit_index(&self) -> usize {
        self.field_names.len()
    }

    /// Name of the focused field, if focus is on a field
    pub fn focused_field(&self) -> Option<&str> {
        self.field_names.get(self.focus).map(String::as_str)
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Esc {
            self.quit = true;
            return Ok(());
        }

        // Fields are hidden while the confirmation is shown
        if self.engine.submission_state() == SubmissionState::Submitted {
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => self.focus_next()?,
            KeyCode::BackTab => self.focus_prev()?,
            KeyCode::Enter => self.submit(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit_focused(|value| value.push(c))?;
            }
            KeyCode::Backspace => {
                self.edit_focused(|value| {
                    value.pop();
                })?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Feed fired reset timers into the engine
    pub fn poll_resets(&mut self) {
        while let Ok(ticket) = self.resets.try_recv() {
            self.engine.on_reset_elapsed(ticket);
            if self.engine.submission_state() == SubmissionState::Editing {
                self.focus = 0;
                self.status_message = None;
            }
        }
    }

    /// Cancel pending timers before exit
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }

    /// Move focus to the next row, blurring the field being left
    fn focus_next(&mut self) -> Result<()> {
        self.blur_focused()?;
        self.focus = (self.focus + 1) % (self.submit_index() + 1);
        Ok(())
    }

    /// Move focus to the previous row, blurring the field being left
    fn focus_prev(&mut self) -> Result<()> {
        self.blur_focused()?;
        if self.focus == 0 {
            self.focus = self.submit_index();
        } else {
            self.focus -= 1;
        }
        Ok(())
    }

    fn blur_focused(&mut self) -> Result<()> {
        if let Some(name) = self.field_names.get(self.focus) {
            self.engine.on_blur(name)?;
        }
        Ok(())
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) -> Result<()> {
        let Some(name) = self.field_names.get(self.focus) else {
            return Ok(());
        };
        let mut value = self.engine.field(name)?.value.clone();
        edit(&mut value);
        self.engine.on_value_change(name, value)?;
        Ok(())
    }

    fn submit(&mut self) {
        let report = self.engine.on_submit();
        if report.is_valid {
            self.status_message = Some("Form submitted successfully!".to_string());
        } else {
            let count = report.errors_by_field.len();
            let noun = if count == 1 { "field needs" } else { "fields need" };
            self.status_message = Some(format!("{count} {noun} attention"));
            // Jump to the first failing field
            if let Some(index) = self
                .field_names
                .iter()
                .position(|name| report.errors_by_field.contains_key(name))
            {
                self.focus = index;
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
