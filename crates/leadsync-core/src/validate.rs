//! Per-field validation of ingested rows

use std::fmt::Write as _;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Field, LeadRecord, RawLead};

/// Allowed length (in characters) of `name` and `lastname`
const NAME_LENGTH: RangeInclusive<usize> = 2..=50;

/// Maximum length (in characters) of `email`
const EMAIL_MAX_LENGTH: usize = 80;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("Invalid regex")
});

/// A failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a row, converting it into a typed record.
///
/// Every field is checked independently; all failures are returned together.
pub fn validate(raw: &RawLead) -> Result<LeadRecord, Vec<FieldError>> {
    let mut errors = Vec::new();

    let id = integer(raw, Field::Id, &mut errors);
    let name = text(raw, Field::Name, &mut errors);
    let lastname = text(raw, Field::Lastname, &mut errors);
    let card = integer(raw, Field::Card, &mut errors);
    let email = email(raw, &mut errors);

    match (id, name, lastname, card, email) {
        (Some(id), Some(name), Some(lastname), Some(card), Some(email)) => {
            Ok(LeadRecord {
                id,
                name,
                lastname,
                card,
                email,
            })
        }
        _ => Err(errors),
    }
}

/// Render field errors for the rejection log, one line per field
#[must_use]
pub fn format_errors(errors: &[FieldError]) -> String {
    let mut output = String::new();
    for error in errors {
        if !output.is_empty() {
            output.push('\n');
        }
        let _ = write!(
            output,
            "Validation field [{}] Error: {}",
            error.field, error.message
        );
    }
    output
}

fn required<'a>(raw: &'a RawLead, field: Field, errors: &mut Vec<FieldError>) -> Option<&'a str> {
    let value = raw.get(field).trim();
    if value.is_empty() {
        errors.push(FieldError::new(
            field,
            format!("The {field} field is required."),
        ));
        None
    } else {
        Some(value)
    }
}

fn integer(raw: &RawLead, field: Field, errors: &mut Vec<FieldError>) -> Option<i64> {
    let value = required(raw, field, errors)?;
    if let Ok(number) = value.parse() {
        Some(number)
    } else {
        errors.push(FieldError::new(
            field,
            format!("The {field} must be an integer."),
        ));
        None
    }
}

fn text(raw: &RawLead, field: Field, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = required(raw, field, errors)?;
    let length = value.chars().count();

    if length < *NAME_LENGTH.start() {
        errors.push(FieldError::new(
            field,
            format!(
                "The {field} must be at least {} characters.",
                NAME_LENGTH.start()
            ),
        ));
        return None;
    }
    if length > *NAME_LENGTH.end() {
        errors.push(FieldError::new(
            field,
            format!(
                "The {field} may not be greater than {} characters.",
                NAME_LENGTH.end()
            ),
        ));
        return None;
    }

    Some(value.to_string())
}

fn email(raw: &RawLead, errors: &mut Vec<FieldError>) -> Option<String> {
    let field = Field::Email;
    let value = required(raw, field, errors)?;

    if value.chars().count() > EMAIL_MAX_LENGTH {
        errors.push(FieldError::new(
            field,
            format!("The {field} may not be greater than {EMAIL_MAX_LENGTH} characters."),
        ));
        return None;
    }
    if !EMAIL_RE.is_match(value) {
        errors.push(FieldError::new(
            field,
            format!("The {field} must be a valid email address."),
        ));
        return None;
    }

    Some(value.to_string())
}
