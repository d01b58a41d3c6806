//! Form engine: the single owner of field and submission state
//!
//! The presentation layer feeds it value-change, blur and submit events and
//! reads state back through read-only accessors. Fired reset timers are fed
//! in through [`FormEngine::on_reset_elapsed`] like any other event.

use super::forms::{
    validate_all, FieldId, FieldSchema, FieldState, FieldStore, FormError, FormSchema,
    FormSnapshot, ValidationError, ValidationReport,
};
use super::submission::{SubmissionLifecycle, SubmissionState};
use crate::scheduler::{ResetScheduler, ResetTicket};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Behaviour switches for a [`FormEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Delay between a successful submit and the automatic reset
    pub reset_delay: Duration,
    /// Re-validate touched fields whose rule reads a field that just changed
    pub revalidate_dependents: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            reset_delay: Duration::from_millis(3000),
            revalidate_dependents: false,
        }
    }
}

/// Owned, serializable copy of one field for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub state: FieldState,
}

/// Owned, serializable copy of the whole form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub submission: SubmissionState,
    pub submitted_at: Option<DateTime<Utc>>,
}

pub struct FormEngine<S> {
    store: FieldStore,
    lifecycle: SubmissionLifecycle<S>,
    revalidate_dependents: bool,
}

impl<S: ResetScheduler> FormEngine<S> {
    pub fn new(schema: FormSchema, scheduler: S, options: EngineOptions) -> Self {
        Self {
            store: FieldStore::new(schema),
            lifecycle: SubmissionLifecycle::new(scheduler, options.reset_delay),
            revalidate_dependents: options.revalidate_dependents,
        }
    }

    /// A field's value changed
    pub fn on_value_change(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let id = self.resolve(field)?;
        self.store.set_value(id, value.into());
        if self.revalidate_dependents {
            self.store.revalidate_touched_dependents(id);
        }
        tracing::debug!(field, error = ?self.store.field(id).error, "value changed");
        Ok(())
    }

    /// A field lost focus. Returns its freshly computed error.
    pub fn on_blur(&mut self, field: &str) -> Result<Option<ValidationError>, FormError> {
        let id = self.resolve(field)?;
        let error = self.store.mark_touched_and_validate(id);
        tracing::debug!(field, ?error, "field blurred");
        Ok(error)
    }

    /// Validate the whole form and submit it when valid
    pub fn on_submit(&mut self) -> ValidationReport {
        let report = validate_all(&mut self.store);
        if !report.is_valid {
            tracing::info!(
                failed = ?report.errors_by_field.keys().collect::<Vec<_>>(),
                "submit rejected"
            );
        } else if !self.lifecycle.on_verdict(true) {
            tracing::debug!("submit while already submitted");
        }
        report
    }

    /// A reset timer fired
    pub fn on_reset_elapsed(&mut self, ticket: ResetTicket) {
        if self.lifecycle.on_reset_elapsed(ticket) {
            self.store.reset();
        }
    }

    /// Cancel any pending reset before the engine goes away
    pub fn shutdown(&mut self) {
        self.lifecycle.shutdown();
    }

    pub fn field(&self, name: &str) -> Result<&FieldState, FormError> {
        self.store.get(name)
    }

    /// Declarations and state of every field in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&FieldSchema, &FieldState)> {
        self.store.iter()
    }

    pub fn snapshot(&self) -> FormSnapshot<'_> {
        self.store.snapshot()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.lifecycle.state()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle.submitted_at()
    }

    pub fn reset_delay(&self) -> Duration {
        self.lifecycle.reset_delay()
    }

    pub fn view(&self) -> FormView {
        FormView {
            fields: self
                .fields()
                .map(|(schema, state)| FieldView {
                    name: schema.name.clone(),
                    label: schema.label.clone(),
                    state: state.clone(),
                })
                .collect(),
            submission: self.submission_state(),
            submitted_at: self.submitted_at(),
        }
    }

    fn resolve(&self, field: &str) -> Result<FieldId, FormError> {
        self.store.schema().resolve(field).inspect_err(|err| {
            tracing::warn!(%err, "event for undeclared field");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{MockResetScheduler, PendingReset, TokioScheduler};

    const VALID: &[(&str, &str)] = &[
        ("fullName", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("password", "Abcdef12"),
        ("confirmPassword", "Abcdef12"),
        ("age", "36"),
    ];

    fn detached_scheduler() -> MockResetScheduler {
        let mut scheduler = MockResetScheduler::new();
        scheduler
            .expect_schedule()
            .returning(|_, _| PendingReset::detached());
        scheduler
    }

    fn engine_with(options: EngineOptions) -> FormEngine<MockResetScheduler> {
        FormEngine::new(FormSchema::signup().unwrap(), detached_scheduler(), options)
    }

    fn engine() -> FormEngine<MockResetScheduler> {
        engine_with(EngineOptions::default())
    }

    fn fill<S: ResetScheduler>(engine: &mut FormEngine<S>, values: &[(&str, &str)]) {
        for (name, value) in values {
            engine.on_value_change(name, *value).unwrap();
        }
    }

    mod events {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_value_change_on_untouched_field_shows_no_error() {
            let mut engine = engine();
            engine.on_value_change("fullName", "J").unwrap();
            let field = engine.field("fullName").unwrap();
            assert_eq!(field.value, "J");
            assert_eq!(field.error, None);
        }

        #[test]
        fn test_blur_then_change_tracks_current_value() {
            let mut engine = engine();
            assert_eq!(
                engine.on_blur("email").unwrap(),
                Some(ValidationError::EmailRequired)
            );
            engine.on_value_change("email", "a@b").unwrap();
            assert_eq!(
                engine.field("email").unwrap().error,
                Some(ValidationError::EmailInvalidFormat)
            );
            engine.on_value_change("email", "a@b.com").unwrap();
            assert_eq!(engine.field("email").unwrap().error, None);
        }

        #[test]
        fn test_unknown_field_fails_fast() {
            let mut engine = engine();
            let expected = FormError::InvalidFieldReference("nickname".to_string());
            assert_eq!(engine.on_value_change("nickname", "x"), Err(expected.clone()));
            assert_eq!(engine.on_blur("nickname"), Err(expected.clone()));
            assert_eq!(engine.field("nickname"), Err(expected));
        }

        #[test]
        fn test_password_change_keeps_confirmation_error_by_default() {
            let mut engine = engine();
            fill(&mut engine, &[("password", "Abcdef12"), ("confirmPassword", "Abcdef12")]);
            engine.on_blur("confirmPassword").unwrap();
            engine.on_value_change("password", "Zyxwvu98").unwrap();
            assert_eq!(engine.field("confirmPassword").unwrap().error, None);
        }

        #[test]
        fn test_password_change_revalidates_confirmation_when_enabled() {
            let mut engine = engine_with(EngineOptions {
                revalidate_dependents: true,
                ..Default::default()
            });
            fill(&mut engine, &[("password", "Abcdef12"), ("confirmPassword", "Abcdef12")]);
            engine.on_blur("confirmPassword").unwrap();
            engine.on_value_change("password", "Zyxwvu98").unwrap();
            assert_eq!(
                engine.field("confirmPassword").unwrap().error,
                Some(ValidationError::ConfirmationMismatch)
            );
        }

        #[test]
        fn test_snapshot_reads_live_values() {
            let mut engine = engine();
            engine.on_value_change("age", "40").unwrap();
            assert_eq!(engine.snapshot().get("age"), Some("40"));
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_valid_form_submits() {
            let mut engine = engine();
            fill(&mut engine, VALID);
            let report = engine.on_submit();
            assert!(report.is_valid);
            assert_eq!(engine.submission_state(), SubmissionState::Submitted);
            assert!(engine.submitted_at().is_some());
            for (_, state) in engine.fields() {
                assert!(state.touched);
                assert_eq!(state.error, None);
            }
        }

        #[test]
        fn test_missing_name_stays_editing() {
            let mut engine = engine();
            fill(&mut engine, &VALID[1..]);
            let report = engine.on_submit();
            assert!(!report.is_valid);
            assert_eq!(report.error_for("fullName"), Some(ValidationError::NameRequired));
            let name = engine.field("fullName").unwrap();
            assert!(name.touched);
            assert_eq!(name.error, Some(ValidationError::NameRequired));
            assert_eq!(engine.submission_state(), SubmissionState::Editing);
        }

        #[test]
        fn test_resubmit_while_submitted_schedules_nothing_new() {
            let mut scheduler = MockResetScheduler::new();
            scheduler
                .expect_schedule()
                .times(1)
                .returning(|_, _| PendingReset::detached());
            let mut engine =
                FormEngine::new(FormSchema::signup().unwrap(), scheduler, EngineOptions::default());
            fill(&mut engine, VALID);
            assert!(engine.on_submit().is_valid);
            assert!(engine.on_submit().is_valid);
            assert_eq!(engine.submission_state(), SubmissionState::Submitted);
        }

        #[test]
        fn test_reset_ticket_restores_defaults() {
            let mut engine = engine();
            fill(&mut engine, VALID);
            engine.on_submit();
            engine.on_reset_elapsed(ResetTicket(0));
            assert_eq!(engine.submission_state(), SubmissionState::Editing);
            for (_, state) in engine.fields() {
                assert_eq!(state, &FieldState::default());
            }
        }

        #[test]
        fn test_stale_ticket_does_not_reset() {
            let mut engine = engine();
            fill(&mut engine, VALID);
            engine.on_submit();
            engine.on_reset_elapsed(ResetTicket(9));
            assert_eq!(engine.submission_state(), SubmissionState::Submitted);
            assert_eq!(engine.field("email").unwrap().value, "ada@example.com");
        }
    }

    mod timer {
        use super::*;
        use pretty_assertions::assert_eq;

        async fn settle() {
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_submit_then_reset_after_delay() {
            let (scheduler, mut rx) = TokioScheduler::channel();
            let mut engine =
                FormEngine::new(FormSchema::signup().unwrap(), scheduler, EngineOptions::default());
            fill(&mut engine, VALID);
            assert!(engine.on_submit().is_valid);
            settle().await;

            tokio::time::advance(Duration::from_millis(2500)).await;
            settle().await;
            assert!(rx.try_recv().is_err());
            assert_eq!(engine.submission_state(), SubmissionState::Submitted);

            tokio::time::advance(Duration::from_millis(500)).await;
            let ticket = rx.recv().await.unwrap();
            engine.on_reset_elapsed(ticket);

            assert_eq!(engine.submission_state(), SubmissionState::Editing);
            for (_, state) in engine.fields() {
                assert_eq!(state, &FieldState::default());
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_shutdown_cancels_pending_reset() {
            let (scheduler, mut rx) = TokioScheduler::channel();
            let mut engine =
                FormEngine::new(FormSchema::signup().unwrap(), scheduler, EngineOptions::default());
            fill(&mut engine, VALID);
            engine.on_submit();
            engine.shutdown();

            tokio::time::advance(Duration::from_millis(10_000)).await;
            settle().await;
            assert!(rx.try_recv().is_err());
        }
    }

    mod view {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_view_serializes_fields_and_state() {
            let mut engine = engine();
            engine.on_value_change("email", "a@b").unwrap();
            engine.on_blur("email").unwrap();

            let view = engine.view();
            assert_eq!(view.fields.len(), 5);
            assert_eq!(view.submission, SubmissionState::Editing);

            let json = serde_json::to_value(&view).unwrap();
            assert_eq!(json["fields"][1]["name"], "email");
            assert_eq!(json["fields"][1]["value"], "a@b");
            assert_eq!(json["fields"][1]["touched"], true);
            assert_eq!(json["fields"][1]["error"], "Please enter a valid email address");
            assert_eq!(json["fields"][0]["error"], serde_json::Value::Null);
            assert_eq!(json["submission"], "Editing");
        }
    }
}
