//! Per-category audit log of a reconciliation run

mod writer;

pub use writer::{audit_file_name, write_audit_files, write_category};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ChangeSet, Field, LeadRecord, RawLead, StoredLead};

/// Outcome category of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rejected,
    New,
    Updated,
    Deleted,
    Restored,
}

impl Category {
    /// Every category, in reporting order
    pub const ALL: [Self; 5] = [
        Self::Rejected,
        Self::New,
        Self::Updated,
        Self::Deleted,
        Self::Restored,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::New => "new",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Restored => "restored",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum AuditEntry {
    Rejected {
        /// Input row number, when the rejection happened before typing
        row: Option<usize>,
        values: BTreeMap<Field, String>,
        error: String,
    },
    New {
        record: LeadRecord,
    },
    Updated {
        record: LeadRecord,
        changes: ChangeSet,
    },
    Restored {
        record: LeadRecord,
        changes: ChangeSet,
    },
    Deleted {
        lead: StoredLead,
        deleted_at: i64,
    },
}

impl AuditEntry {
    /// Rejected entry for a raw row
    pub fn rejected(lead: &RawLead, error: impl Into<String>) -> Self {
        Self::Rejected {
            row: Some(lead.row),
            values: lead.values.clone(),
            error: error.into(),
        }
    }

    /// Rejected entry for a validated record the store refused to take
    pub fn rejected_record(record: &LeadRecord, error: impl Into<String>) -> Self {
        Self::Rejected {
            row: None,
            values: Field::ALL
                .into_iter()
                .map(|field| (field, record.value(field).to_string()))
                .collect(),
            error: error.into(),
        }
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Rejected { .. } => Category::Rejected,
            Self::New { .. } => Category::New,
            Self::Updated { .. } => Category::Updated,
            Self::Restored { .. } => Category::Restored,
            Self::Deleted { .. } => Category::Deleted,
        }
    }

    /// Changed fields of an updated or restored entry
    #[must_use]
    pub const fn changes(&self) -> Option<&ChangeSet> {
        match self {
            Self::Updated { changes, .. } | Self::Restored { changes, .. } => Some(changes),
            _ => None,
        }
    }

    /// Flatten the entry into `(column, value)` pairs.
    ///
    /// All entries of one category share the same column layout. Updated and
    /// restored entries carry a `<field>-old` column for every mutable field,
    /// left empty when that field did not change.
    #[must_use]
    pub fn columns(&self) -> Vec<(String, String)> {
        match self {
            Self::Rejected { values, error, .. } => Field::ALL
                .into_iter()
                .map(|field| {
                    (
                        field.to_string(),
                        values.get(&field).cloned().unwrap_or_default(),
                    )
                })
                .chain([("error".to_string(), error.clone())])
                .collect(),
            Self::New { record } => record_columns(record).collect(),
            Self::Updated { record, changes } | Self::Restored { record, changes } => {
                record_columns(record)
                    .chain(Field::MUTABLE.into_iter().map(|field| {
                        (
                            field.old_column(),
                            changes
                                .get(field)
                                .map(|change| change.old.to_string())
                                .unwrap_or_default(),
                        )
                    }))
                    .collect()
            }
            Self::Deleted { lead, deleted_at } => Field::ALL
                .into_iter()
                .map(|field| (field.to_string(), lead.value(field).to_string()))
                .chain([
                    ("created_at".to_string(), lead.created_at.to_string()),
                    ("updated_at".to_string(), lead.updated_at.to_string()),
                    ("deleted_at".to_string(), deleted_at.to_string()),
                ])
                .collect(),
        }
    }
}

fn record_columns(record: &LeadRecord) -> impl Iterator<Item = (String, String)> + '_ {
    Field::ALL
        .into_iter()
        .map(move |field| (field.to_string(), record.value(field).to_string()))
}

/// Ordered entry lists, one per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditLog {
    rejected: Vec<AuditEntry>,
    new: Vec<AuditEntry>,
    updated: Vec<AuditEntry>,
    deleted: Vec<AuditEntry>,
    restored: Vec<AuditEntry>,
}

impl AuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to its category
    pub fn record(&mut self, entry: AuditEntry) {
        self.list_mut(entry.category()).push(entry);
    }

    /// Append every entry of `other`, keeping category order
    pub fn extend(&mut self, mut other: Self) {
        for category in Category::ALL {
            self.list_mut(category).append(other.list_mut(category));
        }
    }

    /// Entries of one category in processing order
    #[must_use]
    pub fn entries(&self, category: Category) -> &[AuditEntry] {
        match category {
            Category::Rejected => &self.rejected,
            Category::New => &self.new,
            Category::Updated => &self.updated,
            Category::Deleted => &self.deleted,
            Category::Restored => &self.restored,
        }
    }

    /// Number of entries in one category
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.entries(category).len()
    }

    /// All five named sequences, in reporting order
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[AuditEntry])> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.entries(category)))
    }

    /// Only the categories that have entries
    pub fn non_empty(&self) -> impl Iterator<Item = (Category, &[AuditEntry])> {
        self.categories().filter(|(_, entries)| !entries.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.non_empty().next().is_none()
    }

    fn list_mut(&mut self, category: Category) -> &mut Vec<AuditEntry> {
        match category {
            Category::Rejected => &mut self.rejected,
            Category::New => &mut self.new,
            Category::Updated => &mut self.updated,
            Category::Deleted => &mut self.deleted,
            Category::Restored => &mut self.restored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str) -> LeadRecord {
        LeadRecord {
            id: 5,
            name: name.to_string(),
            lastname: "Lee".to_string(),
            card: 100,
            email: "a@x.com".to_string(),
        }
    }

    fn names(columns: &[(String, String)]) -> Vec<&str> {
        columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn test_record_routes_by_category() {
        let mut log = AuditLog::new();
        assert!(log.is_empty());

        log.record(AuditEntry::New {
            record: record("Ann"),
        });
        log.record(AuditEntry::rejected(
            &RawLead::new(2, [(Field::Id, "x")]),
            "bad",
        ));

        assert_eq!(log.count(Category::New), 1);
        assert_eq!(log.count(Category::Rejected), 1);
        assert_eq!(
            log.non_empty().map(|(c, _)| c).collect::<Vec<_>>(),
            vec![Category::Rejected, Category::New]
        );
        assert_eq!(log.categories().count(), 5);
    }

    #[test]
    fn test_rejected_columns_keep_raw_values_and_error() {
        let entry = AuditEntry::rejected(&RawLead::new(3, [(Field::Id, "abc")]), "oops");
        let columns = entry.columns();

        assert_eq!(
            names(&columns),
            vec!["id", "name", "lastname", "card", "email", "error"]
        );
        assert_eq!(columns[0].1, "abc");
        assert_eq!(columns[5].1, "oops");
    }

    #[test]
    fn test_updated_columns_carry_old_values() {
        let stored = StoredLead::from_record(&record("Old"), 0);
        let incoming = record("New");
        let entry = AuditEntry::Updated {
            changes: ChangeSet::between(&stored, &incoming),
            record: incoming,
        };

        let columns = entry.columns();
        assert_eq!(
            names(&columns),
            vec![
                "id",
                "name",
                "lastname",
                "card",
                "email",
                "name-old",
                "lastname-old",
                "card-old",
                "email-old"
            ]
        );
        assert_eq!(columns[1].1, "New");
        assert_eq!(columns[5].1, "Old");
        assert_eq!(columns[6].1, "");
    }

    #[test]
    fn test_deleted_columns() {
        let lead = StoredLead::from_record(&record("Ann"), 10);
        let entry = AuditEntry::Deleted {
            lead,
            deleted_at: 20,
        };

        let columns = entry.columns();
        assert_eq!(columns.last().unwrap(), &("deleted_at".to_string(), "20".to_string()));
        assert_eq!(entry.category(), Category::Deleted);
    }
}
