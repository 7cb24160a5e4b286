//! End-to-end run: ingest, dedup, validate, reconcile

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLog};
use crate::db::LeadStore;
use crate::dedup::deduplicate;
use crate::error::Result;
use crate::ingest::{discover_input, read_leads, read_leads_from_path};
use crate::models::{LeadRecord, RawLead};
use crate::reconcile::Reconciler;
use crate::summary::RunSummary;
use crate::validate::{format_errors, validate};

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub audit: AuditLog,
    /// The snapshot that was processed, when known
    pub input: Option<PathBuf>,
}

impl RunReport {
    /// Report for a run that found nothing to process
    #[must_use]
    pub fn missing_input() -> Self {
        Self {
            summary: RunSummary::failed(),
            audit: AuditLog::new(),
            input: None,
        }
    }

    fn processed(audit: AuditLog, input: Option<PathBuf>) -> Self {
        Self {
            summary: RunSummary::passed(&audit),
            audit,
            input,
        }
    }
}

/// Remove duplicate and invalid rows, logging them as rejected.
///
/// Never touches the store.
pub fn screen(leads: Vec<RawLead>, log: &mut AuditLog) -> Vec<LeadRecord> {
    let dedup = deduplicate(leads);
    for rejection in &dedup.rejected {
        log.record(AuditEntry::rejected(&rejection.lead, &rejection.reason));
    }

    let mut valid = Vec::with_capacity(dedup.accepted.len());
    for lead in &dedup.accepted {
        match validate(lead) {
            Ok(record) => valid.push(record),
            Err(errors) => {
                let error = format_errors(&errors);
                tracing::warn!("Rejecting invalid row {}: {}", lead.row, error.replace('\n', "; "));
                log.record(AuditEntry::rejected(lead, error));
            }
        }
    }

    valid
}

/// Screen ingested rows and reconcile the survivors against `store`
pub fn reconcile_leads<S: LeadStore + ?Sized>(leads: Vec<RawLead>, store: &S) -> Result<AuditLog> {
    let mut log = AuditLog::new();
    let batch = screen(leads, &mut log);
    tracing::debug!(
        "{} rows survived screening, {} rejected",
        batch.len(),
        log.entries(crate::Category::Rejected).len()
    );

    log.extend(Reconciler::new(store).run(&batch)?);
    Ok(log)
}

/// Run over CSV input from any reader
pub fn reconcile_reader<R: Read, S: LeadStore + ?Sized>(input: R, store: &S) -> Result<RunReport> {
    let leads = read_leads(input)?;
    let audit = reconcile_leads(leads, store)?;
    Ok(RunReport::processed(audit, None))
}

/// Run over a CSV file
pub fn reconcile_file<S: LeadStore + ?Sized>(path: &Path, store: &S) -> Result<RunReport> {
    tracing::info!("Reconciling leads from {}", path.display());
    let leads = read_leads_from_path(path)?;
    let audit = reconcile_leads(leads, store)?;
    Ok(RunReport::processed(audit, Some(path.to_path_buf())))
}

/// Discover the snapshot in `dir` and run over it.
///
/// No snapshot is a normal outcome: the report has status `failed` and the
/// store is not touched.
pub fn run_directory<S: LeadStore + ?Sized>(dir: &Path, store: &S) -> Result<RunReport> {
    let Some(path) = discover_input(dir)? else {
        tracing::info!("No lead snapshot found in {}", dir.display());
        return Ok(RunReport::missing_input());
    };

    let report = reconcile_file(&path, store)?;
    tracing::info!(
        "Run {}: {} new, {} updated, {} restored, {} deleted, {} rejected",
        report.summary.status,
        report.summary.counts.new,
        report.summary.counts.updated,
        report.summary.counts.restored,
        report.summary.counts.deleted,
        report.summary.counts.rejected
    );
    Ok(report)
}
