//! Data models for leadsync

mod change;
mod lead;

pub use change::{ChangeSet, FieldChange};
pub use lead::{Field, FieldValue, LeadRecord, RawLead, StoredLead};
