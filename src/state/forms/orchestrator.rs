//! Full-form validation run on submit

use super::rules::ValidationError;
use super::store::FieldStore;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of validating every field at once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors_by_field: BTreeMap<String, ValidationError>,
    pub is_valid: bool,
}

impl ValidationReport {
    pub fn error_for(&self, name: &str) -> Option<ValidationError> {
        self.errors_by_field.get(name).copied()
    }
}

/// Validate every field against the current values, mark them all touched
/// and store the results.
///
/// Errors are computed for all fields before any state is written, so the
/// store never holds a mix of old and new results.
pub fn validate_all(store: &mut FieldStore) -> ValidationReport {
    let results: Vec<_> = store
        .schema()
        .ids()
        .map(|id| (id, store.check(id).err()))
        .collect();

    let mut errors_by_field = BTreeMap::new();
    for (id, error) in results {
        store.apply(id, true, error);
        if let Some(error) = error {
            errors_by_field.insert(store.schema().field(id).name.clone(), error);
        }
    }

    let is_valid = errors_by_field.is_empty();
    tracing::debug!(is_valid, failed = errors_by_field.len(), "validated all fields");
    ValidationReport {
        errors_by_field,
        is_valid,
    }
}
