use std::path::Path;

use leadsync_core::db::{LeadStore, SqliteLeadStore};
use leadsync_core::StoredLead;

use crate::commands::common::{format_lead_lines, lead_to_list_item, open_database, LeadListItem};
use crate::error::CliError;

pub fn list_leads(
    limit: Option<usize>,
    include_trashed: bool,
    db_path: &Path,
) -> Result<Vec<StoredLead>, CliError> {
    let db = open_database(db_path)?;
    let store = SqliteLeadStore::new(db.connection());

    let mut leads = store.list_all(include_trashed)?;
    if let Some(limit) = limit {
        leads.truncate(limit);
    }
    Ok(leads)
}

pub fn run_list(
    limit: Option<usize>,
    include_trashed: bool,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let leads = list_leads(limit, include_trashed, db_path)?;

    if as_json {
        let json_items = leads
            .iter()
            .map(lead_to_list_item)
            .collect::<Vec<LeadListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if leads.is_empty() {
        println!("No leads stored");
    } else {
        for line in format_lead_lines(&leads) {
            println!("{line}");
        }
    }

    Ok(())
}
