//! Lead store trait and `SQLite` implementation

use crate::error::{Error, Result};
use crate::models::{ChangeSet, FieldValue, LeadRecord, StoredLead};
use crate::util::unix_millis_now;
use rusqlite::types::{ToSql, ToSqlOutput};
use rusqlite::{params, params_from_iter, Connection};

/// Storage operations the reconciler needs.
///
/// Lookups include trashed leads. Every mutation is applied immediately;
/// there is no batching or transaction around a run.
pub trait LeadStore {
    /// Get a lead by id, trashed or not
    fn find_by_id(&self, id: i64) -> Result<Option<StoredLead>>;

    /// Get a lead holding `card`, trashed or not
    fn find_by_card(&self, card: i64) -> Result<Option<StoredLead>>;

    /// Create a new active lead
    fn insert(&self, record: &LeadRecord) -> Result<StoredLead>;

    /// Apply changed fields to an existing lead
    fn update(&self, id: i64, changes: &ChangeSet) -> Result<()>;

    /// Soft delete an active lead, returning the deletion timestamp
    fn soft_delete(&self, id: i64) -> Result<i64>;

    /// Restore a trashed lead
    fn restore(&self, id: i64) -> Result<()>;

    /// List leads ordered by id
    fn list_all(&self, include_trashed: bool) -> Result<Vec<StoredLead>>;
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Int(value) => value.to_sql(),
            Self::Text(value) => value.to_sql(),
        }
    }
}

const LEAD_COLUMNS: &str = "id, name, lastname, card, email, created_at, updated_at, deleted_at";

/// `SQLite` implementation of `LeadStore`
pub struct SqliteLeadStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteLeadStore<'a> {
    /// Create a new store with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a lead from a database row
    fn parse_lead(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredLead> {
        Ok(StoredLead {
            id: row.get(0)?,
            name: row.get(1)?,
            lastname: row.get(2)?,
            card: row.get(3)?,
            email: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
            deleted_at: row.get(7)?,
        })
    }

    fn query_one(&self, sql: &str, value: i64) -> Result<Option<StoredLead>> {
        let result = self.conn.query_row(sql, params![value], Self::parse_lead);

        match result {
            Ok(lead) => Ok(Some(lead)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl LeadStore for SqliteLeadStore<'_> {
    fn find_by_id(&self, id: i64) -> Result<Option<StoredLead>> {
        self.query_one(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?"),
            id,
        )
    }

    fn find_by_card(&self, card: i64) -> Result<Option<StoredLead>> {
        self.query_one(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE card = ? ORDER BY id LIMIT 1"),
            card,
        )
    }

    fn insert(&self, record: &LeadRecord) -> Result<StoredLead> {
        let lead = StoredLead::from_record(record, unix_millis_now());

        self.conn.execute(
            "INSERT INTO leads (id, name, lastname, card, email, created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, NULL)",
            params![
                lead.id,
                lead.name,
                lead.lastname,
                lead.card,
                lead.email,
                lead.created_at,
                lead.updated_at
            ],
        )?;

        Ok(lead)
    }

    fn update(&self, id: i64, changes: &ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let assignments = changes
            .iter()
            .map(|change| format!("{} = ?", change.field))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE leads SET {assignments}, updated_at = ? WHERE id = ?");

        let now = FieldValue::Int(unix_millis_now());
        let id_value = FieldValue::Int(id);
        let values = changes
            .iter()
            .map(|change| &change.new)
            .chain([&now, &id_value]);

        let rows = self.conn.execute(&sql, params_from_iter(values))?;
        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn soft_delete(&self, id: i64) -> Result<i64> {
        let now = unix_millis_now();

        let rows = self.conn.execute(
            "UPDATE leads SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
            params![now, now, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(now)
    }

    fn restore(&self, id: i64) -> Result<()> {
        let now = unix_millis_now();

        let rows = self.conn.execute(
            "UPDATE leads SET deleted_at = NULL, updated_at = ? WHERE id = ? AND deleted_at IS NOT NULL",
            params![now, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn list_all(&self, include_trashed: bool) -> Result<Vec<StoredLead>> {
        let filter = if include_trashed {
            ""
        } else {
            "WHERE deleted_at IS NULL"
        };
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {LEAD_COLUMNS} FROM leads {filter} ORDER BY id"))?;

        let leads = stmt
            .query_map([], Self::parse_lead)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(leads)
    }
}
