//! leadsync-core - Core library for leadsync
//!
//! Reconciles a flat-file snapshot of leads against a soft-deleting store:
//! ingestion, intra-batch dedup, validation, diffing and classification into
//! audit categories.

pub mod audit;
pub mod db;
pub mod dedup;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod reconcile;
pub mod summary;
pub mod util;
pub mod validate;

pub use audit::{AuditEntry, AuditLog, Category};
pub use error::{Error, Result};
pub use models::{ChangeSet, Field, FieldChange, FieldValue, LeadRecord, RawLead, StoredLead};
pub use pipeline::RunReport;
pub use summary::{Counts, RunStatus, RunSummary};
