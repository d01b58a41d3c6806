//! Field store: value, touched flag and error for every declared field

use super::error::FormError;
use super::field::{FieldId, FieldSchema, FieldState, FormSchema};
use super::rules::{self, ValidationError};

/// Live read-only view of all field values, used by cross-field rules
#[derive(Debug, Clone, Copy)]
pub struct FormSnapshot<'a> {
    schema: &'a FormSchema,
    fields: &'a [FieldState],
}

impl<'a> FormSnapshot<'a> {
    pub fn new(schema: &'a FormSchema, fields: &'a [FieldState]) -> Self {
        Self { schema, fields }
    }

    pub fn value(&self, id: FieldId) -> &'a str {
        &self.fields[id.index()].value
    }

    /// Value of the field called `name`, if declared
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.schema.resolve(name).ok().map(|id| self.value(id))
    }

    /// `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let schema = self.schema;
        let fields = self.fields;
        schema
            .ids()
            .map(move |id| (schema.field(id).name.as_str(), fields[id.index()].value.as_str()))
    }
}

/// Owns the state of every field in a schema
#[derive(Debug, Clone)]
pub struct FieldStore {
    schema: FormSchema,
    fields: Vec<FieldState>,
}

impl FieldStore {
    pub fn new(schema: FormSchema) -> Self {
        let fields = vec![FieldState::default(); schema.len()];
        Self { schema, fields }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn field(&self, id: FieldId) -> &FieldState {
        &self.fields[id.index()]
    }

    /// Look up field state by name
    pub fn get(&self, name: &str) -> Result<&FieldState, FormError> {
        let id = self.schema.resolve(name)?;
        Ok(self.field(id))
    }

    /// Declarations paired with their current state, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldSchema, &FieldState)> {
        self.schema
            .ids()
            .map(move |id| (self.schema.field(id), self.field(id)))
    }

    pub fn snapshot(&self) -> FormSnapshot<'_> {
        FormSnapshot::new(&self.schema, &self.fields)
    }

    /// Run the field's rule against the current values without storing the result
    pub fn check(&self, id: FieldId) -> Result<(), ValidationError> {
        rules::validate(self.schema.rule(id), &self.field(id).value, &self.snapshot())
    }

    /// Store a new value. A touched field is re-validated straight away;
    /// an untouched one keeps its error untouched until first blur.
    pub fn set_value(&mut self, id: FieldId, value: String) {
        self.fields[id.index()].value = value;
        if self.fields[id.index()].touched {
            self.revalidate(id);
        }
    }

    /// Mark the field touched and re-validate it unconditionally
    pub fn mark_touched_and_validate(&mut self, id: FieldId) -> Option<ValidationError> {
        self.fields[id.index()].touched = true;
        self.revalidate(id)
    }

    /// Re-validate touched fields whose rule reads `id`
    pub fn revalidate_touched_dependents(&mut self, id: FieldId) {
        let dependents: Vec<_> = self.schema.dependents_of(id).collect();
        for dependent in dependents {
            if self.fields[dependent.index()].touched {
                self.revalidate(dependent);
            }
        }
    }

    /// Overwrite touched and error together
    pub(super) fn apply(&mut self, id: FieldId, touched: bool, error: Option<ValidationError>) {
        let state = &mut self.fields[id.index()];
        state.touched = touched;
        state.error = error;
    }

    /// Return every field to empty, untouched, no error
    pub fn reset(&mut self) {
        for state in &mut self.fields {
            *state = FieldState::default();
        }
    }

    fn revalidate(&mut self, id: FieldId) -> Option<ValidationError> {
        let error = self.check(id).err();
        self.fields[id.index()].error = error;
        error
    }
}
