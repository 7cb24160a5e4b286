//! In-memory lead store

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{ChangeSet, LeadRecord, StoredLead};
use crate::util::unix_millis_now;

use super::LeadStore;

/// `LeadStore` backed by a map, for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    leads: RefCell<BTreeMap<i64, StoredLead>>,
}

impl MemoryLeadStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing leads
    #[must_use]
    pub fn with_leads(leads: impl IntoIterator<Item = StoredLead>) -> Self {
        Self {
            leads: RefCell::new(leads.into_iter().map(|lead| (lead.id, lead)).collect()),
        }
    }

    /// Snapshot of every lead, ordered by id
    #[must_use]
    pub fn snapshot(&self) -> Vec<StoredLead> {
        self.leads.borrow().values().cloned().collect()
    }

    fn now() -> i64 {
        unix_millis_now()
    }
}

impl LeadStore for MemoryLeadStore {
    fn find_by_id(&self, id: i64) -> Result<Option<StoredLead>> {
        Ok(self.leads.borrow().get(&id).cloned())
    }

    fn find_by_card(&self, card: i64) -> Result<Option<StoredLead>> {
        Ok(self
            .leads
            .borrow()
            .values()
            .find(|lead| lead.card == card)
            .cloned())
    }

    fn insert(&self, record: &LeadRecord) -> Result<StoredLead> {
        let mut leads = self.leads.borrow_mut();
        if leads.contains_key(&record.id) {
            return Err(Error::InvalidInput(format!(
                "lead {} already exists",
                record.id
            )));
        }

        let lead = StoredLead::from_record(record, Self::now());
        leads.insert(lead.id, lead.clone());
        Ok(lead)
    }

    fn update(&self, id: i64, changes: &ChangeSet) -> Result<()> {
        let mut leads = self.leads.borrow_mut();
        let lead = leads
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if !changes.is_empty() {
            changes.apply_to(lead);
            lead.updated_at = Self::now();
        }
        Ok(())
    }

    fn soft_delete(&self, id: i64) -> Result<i64> {
        let mut leads = self.leads.borrow_mut();
        let lead = leads
            .get_mut(&id)
            .filter(|lead| !lead.is_trashed())
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let now = Self::now();
        lead.deleted_at = Some(now);
        lead.updated_at = now;
        Ok(now)
    }

    fn restore(&self, id: i64) -> Result<()> {
        let mut leads = self.leads.borrow_mut();
        let lead = leads
            .get_mut(&id)
            .filter(|lead| lead.is_trashed())
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        lead.deleted_at = None;
        lead.updated_at = Self::now();
        Ok(())
    }

    fn list_all(&self, include_trashed: bool) -> Result<Vec<StoredLead>> {
        Ok(self
            .leads
            .borrow()
            .values()
            .filter(|lead| include_trashed || !lead.is_trashed())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, card: i64) -> LeadRecord {
        LeadRecord {
            id,
            name: "Ann".to_string(),
            lastname: "Lee".to_string(),
            card,
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn test_lifecycle() {
        let store = MemoryLeadStore::new();
        store.insert(&record(1, 100)).unwrap();
        assert!(store.insert(&record(1, 100)).is_err());

        let deleted_at = store.soft_delete(1).unwrap();
        assert_eq!(store.find_by_id(1).unwrap().unwrap().deleted_at, Some(deleted_at));
        assert!(store.list_all(false).unwrap().is_empty());
        assert!(store.soft_delete(1).is_err());

        store.restore(1).unwrap();
        assert_eq!(store.list_all(false).unwrap().len(), 1);
        assert!(store.restore(1).is_err());
    }

    #[test]
    fn test_find_by_card() {
        let store = MemoryLeadStore::with_leads([StoredLead::from_record(&record(4, 400), 0)]);
        assert_eq!(store.find_by_card(400).unwrap().map(|l| l.id), Some(4));
        assert!(store.find_by_card(401).unwrap().is_none());
    }
}
