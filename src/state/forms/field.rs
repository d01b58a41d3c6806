//! Form field declarations and per-field state

use super::error::FormError;
use super::rules::{FieldKind, Rule, ValidationError};
use serde::Serialize;
use std::collections::HashMap;

/// Index of a declared field, only obtainable from the schema that declared it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Declaration of a single form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// Value should be masked when rendered
    pub is_secret: bool,
}

impl FieldSchema {
    fn new(name: &str, label: &str, kind: FieldKind, is_secret: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            is_secret,
        }
    }

    /// Create a full name field
    pub fn full_name(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::FullName, false)
    }

    /// Create an email field
    pub fn email(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Email, false)
    }

    /// Create a password field
    pub fn password(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Password, true)
    }

    /// Create a field that must repeat the value of `target`
    pub fn confirmation(name: &str, label: &str, target: &str) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Confirmation {
                target: target.to_string(),
            },
            true,
        )
    }

    /// Create an age field
    pub fn age(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Age, false)
    }
}

/// Mutable state of one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub value: String,
    pub touched: bool,
    pub error: Option<ValidationError>,
}

impl FieldState {
    /// Error to show, if any. Untouched fields never display one.
    pub fn visible_error(&self) -> Option<ValidationError> {
        if self.touched {
            self.error
        } else {
            None
        }
    }
}

/// Fixed set of fields a form is built from
#[derive(Debug, Clone)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
    rules: Vec<Rule>,
    by_name: HashMap<String, FieldId>,
}

impl FormSchema {
    /// Declare a form. Names must be unique and confirmation targets declared.
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self, FormError> {
        let mut by_name = HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if by_name.insert(field.name.clone(), FieldId(index)).is_some() {
                return Err(FormError::DuplicateField(field.name.clone()));
            }
        }

        let mut rules = Vec::with_capacity(fields.len());
        for field in &fields {
            let rule = match &field.kind {
                FieldKind::FullName => Rule::FullName,
                FieldKind::Email => Rule::Email,
                FieldKind::Password => Rule::Password,
                FieldKind::Age => Rule::Age,
                FieldKind::Confirmation { target } => {
                    let id = by_name.get(target).copied().ok_or_else(|| {
                        FormError::UnknownDependency {
                            field: field.name.clone(),
                            target: target.clone(),
                        }
                    })?;
                    Rule::Confirmation(id)
                }
            };
            rules.push(rule);
        }

        Ok(Self {
            fields,
            rules,
            by_name,
        })
    }

    /// The signup form: name, email, password, confirmation and age
    pub fn signup() -> Result<Self, FormError> {
        Self::new(vec![
            FieldSchema::full_name("fullName", "Full Name"),
            FieldSchema::email("email", "Email"),
            FieldSchema::password("password", "Password"),
            FieldSchema::confirmation("confirmPassword", "Confirm Password", "password"),
            FieldSchema::age("age", "Age"),
        ])
    }

    /// Look up a field by name
    pub fn resolve(&self, name: &str) -> Result<FieldId, FormError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| FormError::InvalidFieldReference(name.to_string()))
    }

    pub fn field(&self, id: FieldId) -> &FieldSchema {
        &self.fields[id.0]
    }

    pub fn rule(&self, id: FieldId) -> Rule {
        self.rules[id.0]
    }

    /// Field ids in declaration order
    pub fn ids(&self) -> impl Iterator<Item = FieldId> {
        (0..self.fields.len()).map(FieldId)
    }

    /// Fields whose rule reads the value of `id`
    pub fn dependents_of(&self, id: FieldId) -> impl Iterator<Item = FieldId> + '_ {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.depends_on() == Some(id))
            .map(|(index, _)| FieldId(index))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod field_schema {
        use super::*;

        #[test]
        fn test_password_fields_are_secret() {
            assert!(FieldSchema::password("p", "P").is_secret);
            assert!(FieldSchema::confirmation("c", "C", "p").is_secret);
            assert!(!FieldSchema::email("e", "E").is_secret);
        }

        #[test]
        fn test_confirmation_keeps_target() {
            let field = FieldSchema::confirmation("c", "C", "p");
            assert_eq!(
                field.kind,
                FieldKind::Confirmation {
                    target: "p".to_string()
                }
            );
        }
    }

    mod field_state {
        use super::*;

        #[test]
        fn test_default_is_empty_untouched_valid() {
            let state = FieldState::default();
            assert_eq!(state.value, "");
            assert!(!state.touched);
            assert!(state.error.is_none());
        }

        #[test]
        fn test_visible_error_hidden_until_touched() {
            let mut state = FieldState {
                error: Some(ValidationError::AgeRequired),
                ..Default::default()
            };
            assert_eq!(state.visible_error(), None);
            state.touched = true;
            assert_eq!(state.visible_error(), Some(ValidationError::AgeRequired));
        }
    }

    mod form_schema {
        use super::*;

        #[test]
        fn test_signup_declares_five_fields_in_order() {
            let schema = FormSchema::signup().unwrap();
            let names: Vec<_> = schema
                .ids()
                .map(|id| schema.field(id).name.as_str())
                .collect();
            assert_eq!(
                names,
                ["fullName", "email", "password", "confirmPassword", "age"]
            );
        }

        #[test]
        fn test_resolve_unknown_name_fails() {
            let schema = FormSchema::signup().unwrap();
            assert_eq!(
                schema.resolve("nickname"),
                Err(FormError::InvalidFieldReference("nickname".to_string()))
            );
        }

        #[test]
        fn test_duplicate_names_are_rejected() {
            let result = FormSchema::new(vec![
                FieldSchema::email("email", "Email"),
                FieldSchema::email("email", "Backup Email"),
            ]);
            assert_eq!(
                result.unwrap_err(),
                FormError::DuplicateField("email".to_string())
            );
        }

        #[test]
        fn test_unknown_confirmation_target_is_rejected() {
            let result = FormSchema::new(vec![FieldSchema::confirmation(
                "confirm", "Confirm", "secret",
            )]);
            assert_eq!(
                result.unwrap_err(),
                FormError::UnknownDependency {
                    field: "confirm".to_string(),
                    target: "secret".to_string(),
                }
            );
        }

        #[test]
        fn test_confirmation_may_precede_its_target() {
            let schema = FormSchema::new(vec![
                FieldSchema::confirmation("confirm", "Confirm", "secret"),
                FieldSchema::password("secret", "Secret"),
            ])
            .unwrap();
            let secret = schema.resolve("secret").unwrap();
            let confirm = schema.resolve("confirm").unwrap();
            assert_eq!(schema.rule(confirm), Rule::Confirmation(secret));
        }

        #[test]
        fn test_dependents_of_password() {
            let schema = FormSchema::signup().unwrap();
            let password = schema.resolve("password").unwrap();
            let dependents: Vec<_> = schema.dependents_of(password).collect();
            assert_eq!(dependents, vec![schema.resolve("confirmPassword").unwrap()]);
            let email = schema.resolve("email").unwrap();
            assert_eq!(schema.dependents_of(email).count(), 0);
        }

        #[test]
        fn test_len() {
            let schema = FormSchema::signup().unwrap();
            assert_eq!(schema.len(), 5);
            assert!(!schema.is_empty());
        }
    }
}
