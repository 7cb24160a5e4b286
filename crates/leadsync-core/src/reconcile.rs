//! Reconciliation of a validated batch against the lead store
//!
//! Each incoming record is looked up by id (trashed leads included) and
//! classified as new, updated, restored, unchanged or rejected for a card
//! conflict. Store actions are applied as soon as they are decided. Once the
//! batch is done, active leads whose id was not in the batch are soft-deleted.

use std::collections::HashSet;

use crate::audit::{AuditEntry, AuditLog};
use crate::db::LeadStore;
use crate::error::Result;
use crate::models::{ChangeSet, LeadRecord};

/// What happened to one incoming record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// No stored lead with this id; inserted
    New,
    /// Active lead with differing fields; changes applied
    Updated(ChangeSet),
    /// Trashed lead brought back, with any differing fields applied
    Restored(ChangeSet),
    /// Active lead with identical fields; nothing done, nothing logged
    Unchanged,
    /// The incoming card belongs to another stored lead; nothing done
    CardConflict { holder: i64 },
}

/// Applies a batch to a `LeadStore`
pub struct Reconciler<'a, S: LeadStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: LeadStore + ?Sized> Reconciler<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Classify one record and apply the resulting store action
    pub fn reconcile_one(&self, record: &LeadRecord) -> Result<Classification> {
        let Some(stored) = self.store.find_by_id(record.id)? else {
            self.store.insert(record)?;
            return Ok(Classification::New);
        };

        // The id matches one lead; the card must not point at a different one
        if stored.card != record.card {
            if let Some(holder) = self.store.find_by_card(record.card)? {
                return Ok(Classification::CardConflict { holder: holder.id });
            }
        }

        let changes = ChangeSet::between(&stored, record);

        if stored.is_trashed() {
            self.store.restore(record.id)?;
            if !changes.is_empty() {
                self.store.update(record.id, &changes)?;
            }
            return Ok(Classification::Restored(changes));
        }

        if changes.is_empty() {
            return Ok(Classification::Unchanged);
        }

        self.store.update(record.id, &changes)?;
        Ok(Classification::Updated(changes))
    }

    /// Soft-delete every active lead whose id is not in `keep`
    pub fn delete_missing(&self, keep: &HashSet<i64>) -> Result<Vec<AuditEntry>> {
        let mut entries = Vec::new();

        for mut lead in self.store.list_all(false)? {
            if keep.contains(&lead.id) {
                continue;
            }

            let deleted_at = self.store.soft_delete(lead.id)?;
            tracing::debug!("Lead {} deleted", lead.id);
            lead.deleted_at = Some(deleted_at);
            entries.push(AuditEntry::Deleted { lead, deleted_at });
        }

        Ok(entries)
    }

    /// Reconcile a whole validated batch.
    ///
    /// Ids of records rejected for a card conflict still count as present in
    /// the batch, so their stored leads are not deleted.
    pub fn run(&self, batch: &[LeadRecord]) -> Result<AuditLog> {
        let mut log = AuditLog::new();

        for record in batch {
            match self.reconcile_one(record)? {
                Classification::New => {
                    tracing::debug!("Lead {} inserted", record.id);
                    log.record(AuditEntry::New {
                        record: record.clone(),
                    });
                }
                Classification::Updated(changes) => {
                    tracing::debug!("Lead {} updated ({} fields)", record.id, changes.len());
                    log.record(AuditEntry::Updated {
                        record: record.clone(),
                        changes,
                    });
                }
                Classification::Restored(changes) => {
                    tracing::debug!("Lead {} restored ({} fields)", record.id, changes.len());
                    log.record(AuditEntry::Restored {
                        record: record.clone(),
                        changes,
                    });
                }
                Classification::Unchanged => {
                    tracing::debug!("Lead {} unchanged", record.id);
                }
                Classification::CardConflict { holder } => {
                    tracing::warn!(
                        "Rejecting lead {}: card {} belongs to lead {holder}",
                        record.id,
                        record.card
                    );
                    log.record(AuditEntry::rejected_record(
                        record,
                        format!(
                            "Conflict field [card] Error: The card {} already belongs to lead {holder}.",
                            record.card
                        ),
                    ));
                }
            }
        }

        let keep = batch.iter().map(|record| record.id).collect::<HashSet<_>>();
        for entry in self.delete_missing(&keep)? {
            log.record(entry);
        }

        Ok(log)
    }
}
