//! Form domain layer
//!
//! Field declarations, validation rules, the per-field store and the
//! full-form validation run on submit.

mod error;
mod field;
mod orchestrator;
mod rules;
mod store;

pub use error::FormError;
pub use field::{FieldId, FieldSchema, FieldState, FormSchema};
pub use orchestrator::{validate_all, ValidationReport};
pub use rules::ValidationError;
pub use store::{FieldStore, FormSnapshot};
