use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use leadsync_core::audit::write_audit_files;
use leadsync_core::db::SqliteLeadStore;
use leadsync_core::pipeline::run_directory;
use leadsync_core::RunSummary;
use serde::Serialize;

use crate::commands::common::open_database;
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct ParseOutput {
    #[serde(flatten)]
    pub summary: RunSummary,
    pub input: Option<PathBuf>,
    pub audit_files: Vec<PathBuf>,
    /// Set when the store was reconciled but the audit files could not be written
    #[serde(skip)]
    pub audit_failure: Option<leadsync_core::Error>,
}

impl ParseOutput {
    fn failed() -> Self {
        Self {
            summary: RunSummary::failed(),
            input: None,
            audit_files: Vec::new(),
            audit_failure: None,
        }
    }
}

/// Reconcile the snapshot in `leads_dir`, writing audit files to `logs_dir`
/// unless it is `None`.
///
/// The store is already reconciled when audit files are written, so a write
/// failure lands in `audit_failure` next to the real summary.
pub fn execute_parse(
    leads_dir: &Path,
    logs_dir: Option<&Path>,
    db_path: &Path,
    at: NaiveDateTime,
) -> Result<ParseOutput, CliError> {
    let db = open_database(db_path)?;
    let store = SqliteLeadStore::new(db.connection());
    let report = run_directory(leads_dir, &store)?;

    let mut output = ParseOutput {
        summary: report.summary,
        input: report.input,
        audit_files: Vec::new(),
        audit_failure: None,
    };

    if let Some(dir) = logs_dir {
        match write_audit_files(&report.audit, dir, at) {
            Ok(paths) => output.audit_files = paths,
            Err(error) => output.audit_failure = Some(error),
        }
    }

    Ok(output)
}

pub fn run_parse(
    leads_dir: &Path,
    logs_dir: Option<&Path>,
    db_path: &Path,
    as_json: bool,
) -> Result<(), CliError> {
    let at = chrono::Local::now().naive_local();

    match execute_parse(leads_dir, logs_dir, db_path, at) {
        Ok(mut output) => {
            let audit_failure = output.audit_failure.take();
            print_output(&output, as_json)?;
            match audit_failure {
                Some(error) => {
                    tracing::error!("Leads reconciled but audit files were not written: {error}");
                    Err(error.into())
                }
                None => Ok(()),
            }
        }
        Err(error) => {
            tracing::error!("Run aborted: {error}");
            print_output(&ParseOutput::failed(), as_json)?;
            Err(error)
        }
    }
}

fn print_output(output: &ParseOutput, as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        println!("{}", output.summary);
    }
    Ok(())
}
