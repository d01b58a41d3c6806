//! Validation rules for form fields
//!
//! Each rule is a pure function of the field value and the current
//! [`FormSnapshot`]. Checks run top to bottom and stop at the first failure.

use super::field::FieldId;
use super::store::FormSnapshot;
use serde::{Serialize, Serializer};

/// Minimum accepted age (inclusive)
pub const MIN_AGE: u32 = 13;
/// Maximum accepted age (inclusive)
pub const MAX_AGE: u32 = 120;
/// Minimum trimmed length of a full name
pub const MIN_NAME_LEN: usize = 2;
/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Kind of field as declared in a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    FullName,
    Email,
    Password,
    /// Must equal the value of the named field
    Confirmation { target: String },
    Age,
}

/// Rule resolved against a schema, with cross-field references bound to ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    FullName,
    Email,
    Password,
    Confirmation(FieldId),
    Age,
}

impl Rule {
    /// Field whose value this rule reads besides its own
    pub fn depends_on(&self) -> Option<FieldId> {
        match self {
            Rule::Confirmation(target) => Some(*target),
            _ => None,
        }
    }
}

/// A failed check on a single field. The display text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Full name is required")]
    NameRequired,
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Name can only contain letters and spaces")]
    NameInvalidCharacters,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailInvalidFormat,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Password must contain uppercase, lowercase, and number")]
    PasswordMissingCharacterClass,
    #[error("Please confirm your password")]
    ConfirmationRequired,
    #[error("Passwords do not match")]
    ConfirmationMismatch,
    #[error("Age is required")]
    AgeRequired,
    #[error("Age must be a number")]
    AgeNotANumber,
    #[error("Age must be between 13 and 120")]
    AgeOutOfRange,
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Apply `rule` to `value`, reading other fields from `snapshot`
pub fn validate(
    rule: Rule,
    value: &str,
    snapshot: &FormSnapshot<'_>,
) -> Result<(), ValidationError> {
    match rule {
        Rule::FullName => validate_full_name(value),
        Rule::Email => validate_email(value),
        Rule::Password => validate_password(value),
        Rule::Confirmation(target) => validate_confirmation(value, snapshot.value(target)),
        Rule::Age => validate_age(value),
    }
}

/// Whitespace for trimming and the name and email checks. Unlike
/// `char::is_whitespace`, U+FEFF counts and U+0085 does not.
fn is_form_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

fn trim_form_whitespace(value: &str) -> &str {
    value.trim_matches(is_form_whitespace)
}

/// Length in UTF-16 code units, the unit the length limits are stated in
fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn validate_full_name(value: &str) -> Result<(), ValidationError> {
    let trimmed = trim_form_whitespace(value);
    if trimmed.is_empty() {
        Err(ValidationError::NameRequired)
    } else if utf16_len(trimmed) < MIN_NAME_LEN {
        Err(ValidationError::NameTooShort)
    } else if !value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || is_form_whitespace(c))
    {
        Err(ValidationError::NameInvalidCharacters)
    } else {
        Ok(())
    }
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    if trim_form_whitespace(value).is_empty() {
        Err(ValidationError::EmailRequired)
    } else if !is_email_shaped(value) {
        Err(ValidationError::EmailInvalidFormat)
    } else {
        Ok(())
    }
}

/// `local@domain.tld` where no part contains whitespace or `@`
fn is_email_shaped(value: &str) -> bool {
    let is_part =
        |s: &str| !s.is_empty() && !s.chars().any(|c| is_form_whitespace(c) || c == '@');

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if !is_part(local) || !is_part(domain) {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if utf16_len(value) < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if has_lower && has_upper && has_digit {
        Ok(())
    } else {
        Err(ValidationError::PasswordMissingCharacterClass)
    }
}

fn validate_confirmation(value: &str, target: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::ConfirmationRequired)
    } else if value != target {
        Err(ValidationError::ConfirmationMismatch)
    } else {
        Ok(())
    }
}

fn validate_age(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::AgeRequired);
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::AgeNotANumber);
    }
    // Digit strings that overflow u32 are far outside the range anyway
    match value.parse::<u32>() {
        Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => Ok(()),
        _ => Err(ValidationError::AgeOutOfRange),
    }
}
