//! Run status and per-category counters

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audit::{AuditLog, Category};

/// Overall status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// An input file was found and processed
    Passed,
    /// No input was processed
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Number of records per outcome category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub new: usize,
    pub deleted: usize,
    pub restored: usize,
    pub updated: usize,
    pub rejected: usize,
}

impl Counts {
    /// Total of store-mutating outcomes (everything but `rejected`)
    #[must_use]
    pub const fn mutations(&self) -> usize {
        self.new + self.updated + self.deleted + self.restored
    }
}

impl From<&AuditLog> for Counts {
    fn from(log: &AuditLog) -> Self {
        Self {
            new: log.count(Category::New),
            deleted: log.count(Category::Deleted),
            restored: log.count(Category::Restored),
            updated: log.count(Category::Updated),
            rejected: log.count(Category::Rejected),
        }
    }
}

/// Final report of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub counts: Counts,
}

impl RunSummary {
    /// Summary of a processed batch
    #[must_use]
    pub fn passed(log: &AuditLog) -> Self {
        Self {
            status: RunStatus::Passed,
            counts: Counts::from(log),
        }
    }

    /// Summary of a run that processed nothing
    #[must_use]
    pub fn failed() -> Self {
        Self {
            status: RunStatus::Failed,
            counts: Counts::default(),
        }
    }
}

const RULE: &str = "-------------";

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        writeln!(f, "{RULE}")?;
        writeln!(f, "status: {}", self.status)?;
        writeln!(
            f,
            "new: {} deleted: {} restored: {} updated: {} rejected: {}",
            c.new, c.deleted, c.restored, c.updated, c.rejected
        )?;
        write!(f, "{RULE}")
    }
}
