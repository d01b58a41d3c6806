//! Errors raised by incorrect use of the form API

/// Programmer errors: referencing fields that were never declared, or
/// declaring a schema that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("no field named {0:?} is declared in this form")]
    InvalidFieldReference(String),
    #[error("field {0:?} is declared more than once")]
    DuplicateField(String),
    #[error("field {field:?} confirms {target:?}, which is not declared")]
    UnknownDependency { field: String, target: String },
}
