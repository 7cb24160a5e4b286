use std::path::Path;

use leadsync_core::db::Database;
use leadsync_core::StoredLead;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct LeadListItem {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub card: i64,
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
    pub trashed: bool,
}

pub fn open_database(path: &Path) -> Result<Database, CliError> {
    Ok(Database::open(path)?)
}

pub fn lead_to_list_item(lead: &StoredLead) -> LeadListItem {
    LeadListItem {
        id: lead.id,
        name: lead.name.clone(),
        lastname: lead.lastname.clone(),
        card: lead.card,
        email: lead.email.clone(),
        created_at: lead.created_at,
        updated_at: lead.updated_at,
        deleted_at: lead.deleted_at,
        trashed: lead.is_trashed(),
    }
}

pub fn format_lead_lines(leads: &[StoredLead]) -> Vec<String> {
    leads
        .iter()
        .map(|lead| {
            let full_name = format!("{} {}", lead.name, lead.lastname);
            let line = format!(
                "{:>8}  {full_name:<32}  {:>12}  {}",
                lead.id, lead.card, lead.email
            );

            match lead.deleted_at {
                Some(deleted_at) => format!("{line}  [trashed {}]", format_timestamp(deleted_at)),
                None => line,
            }
        })
        .collect()
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
