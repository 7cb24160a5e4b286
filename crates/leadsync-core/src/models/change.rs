//! Field-level diff between a stored lead and an incoming record

use serde::{Deserialize, Serialize};

use super::{Field, FieldValue, LeadRecord, StoredLead};

/// One changed field with its previous and incoming values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: Field,
    pub old: FieldValue,
    pub new: FieldValue,
}

/// Ordered set of changed mutable fields. Never contains `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    changes: Vec<FieldChange>,
}

impl ChangeSet {
    /// Diff every mutable field of `incoming` against `stored`
    #[must_use]
    pub fn between(stored: &StoredLead, incoming: &LeadRecord) -> Self {
        let changes = Field::MUTABLE
            .into_iter()
            .filter_map(|field| {
                let old = stored.value(field);
                let new = incoming.value(field);
                (old != new).then_some(FieldChange { field, old, new })
            })
            .collect();
        Self { changes }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldChange> {
        self.changes.iter()
    }

    /// Change recorded for a field, if it changed
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldChange> {
        self.changes.iter().find(|change| change.field == field)
    }

    /// Apply the incoming values to a stored lead
    pub fn apply_to(&self, lead: &mut StoredLead) {
        for change in &self.changes {
            lead.set(change.field, &change.new);
        }
    }
}
