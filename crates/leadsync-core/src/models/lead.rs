//! Lead models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical lead fields, in column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Id,
    Name,
    Lastname,
    Card,
    Email,
}

impl Field {
    /// Every field, in canonical order
    pub const ALL: [Self; 5] = [Self::Id, Self::Name, Self::Lastname, Self::Card, Self::Email];

    /// Fields a reconciliation may change (everything but `id`)
    pub const MUTABLE: [Self; 4] = [Self::Name, Self::Lastname, Self::Card, Self::Email];

    /// Canonical field name, as used in audit columns and the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Lastname => "lastname",
            Self::Card => "card",
            Self::Email => "email",
        }
    }

    /// Column name holding the previous value of a changed field
    #[must_use]
    pub fn old_column(self) -> String {
        format!("{}-old", self.as_str())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// An ingested row before validation: canonical field -> raw cell text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLead {
    /// 1-based data row number (the header row is not counted)
    pub row: usize,
    /// Raw values keyed by canonical field
    pub values: BTreeMap<Field, String>,
}

impl RawLead {
    /// Build a raw lead from `(field, value)` pairs
    pub fn new<I, S>(row: usize, values: I) -> Self
    where
        I: IntoIterator<Item = (Field, S)>,
        S: Into<String>,
    {
        Self {
            row,
            values: values
                .into_iter()
                .map(|(field, value)| (field, value.into()))
                .collect(),
        }
    }

    /// Raw value of a field, empty when the cell was missing
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    /// Whether every cell is blank
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.values.values().all(|value| value.trim().is_empty())
    }
}

/// A validated incoming lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Primary identity
    pub id: i64,
    pub name: String,
    pub lastname: String,
    /// Secondary identity
    pub card: i64,
    pub email: String,
}

impl LeadRecord {
    /// Typed value of a field
    #[must_use]
    pub fn value(&self, field: Field) -> FieldValue {
        match field {
            Field::Id => FieldValue::Int(self.id),
            Field::Name => FieldValue::Text(self.name.clone()),
            Field::Lastname => FieldValue::Text(self.lastname.clone()),
            Field::Card => FieldValue::Int(self.card),
            Field::Email => FieldValue::Text(self.email.clone()),
        }
    }
}

/// A persisted lead, possibly soft-deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLead {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub card: i64,
    pub email: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
    /// Soft delete timestamp (Unix ms), `None` while active
    pub deleted_at: Option<i64>,
}

impl StoredLead {
    /// Create an active stored lead from an incoming record
    #[must_use]
    pub fn from_record(record: &LeadRecord, now: i64) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            lastname: record.lastname.clone(),
            card: record.card,
            email: record.email.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Whether the lead is soft-deleted
    #[must_use]
    pub const fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Typed value of a field
    #[must_use]
    pub fn value(&self, field: Field) -> FieldValue {
        match field {
            Field::Id => FieldValue::Int(self.id),
            Field::Name => FieldValue::Text(self.name.clone()),
            Field::Lastname => FieldValue::Text(self.lastname.clone()),
            Field::Card => FieldValue::Int(self.card),
            Field::Email => FieldValue::Text(self.email.clone()),
        }
    }

    /// Overwrite a mutable field. `id` is immutable and ignored.
    pub fn set(&mut self, field: Field, value: &FieldValue) {
        match (field, value) {
            (Field::Name, FieldValue::Text(text)) => text.clone_into(&mut self.name),
            (Field::Lastname, FieldValue::Text(text)) => text.clone_into(&mut self.lastname),
            (Field::Card, FieldValue::Int(card)) => self.card = *card,
            (Field::Email, FieldValue::Text(text)) => text.clone_into(&mut self.email),
            _ => {}
        }
    }
}
