//! CSV audit file output

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::{AuditEntry, AuditLog, Category};
use crate::error::Result;

/// Build the audit file name for a category: `<category>-<YYYYmmdd-HHMMSS>.csv`
#[must_use]
pub fn audit_file_name(category: Category, at: NaiveDateTime) -> String {
    format!("{category}-{}.csv", at.format("%Y%m%d-%H%M%S"))
}

/// Write entries as CSV.
///
/// The header is taken from the first entry's columns; nothing is written for
/// an empty slice.
pub fn write_category<W: Write>(entries: &[AuditEntry], output: W) -> Result<()> {
    let Some(first) = entries.first() else {
        return Ok(());
    };

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(first.columns().iter().map(|(name, _)| name))?;
    for entry in entries {
        writer.write_record(entry.columns().iter().map(|(_, value)| value))?;
    }
    writer.flush()?;

    Ok(())
}

/// Write one CSV file per non-empty category into `dir`.
///
/// Returns the paths written, in category order.
pub fn write_audit_files(log: &AuditLog, dir: &Path, at: NaiveDateTime) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for (category, entries) in log.non_empty() {
        if written.is_empty() {
            fs::create_dir_all(dir)?;
        }

        let path = dir.join(audit_file_name(category, at));
        write_category(entries, fs::File::create(&path)?)?;
        tracing::info!(
            "Wrote {} {category} entries to {}",
            entries.len(),
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, LeadRecord, RawLead};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap()
    }

    fn new_entry(id: i64, name: &str) -> AuditEntry {
        AuditEntry::New {
            record: LeadRecord {
                id,
                name: name.to_string(),
                lastname: "Lee".to_string(),
                card: id * 100,
                email: "a@x.com".to_string(),
            },
        }
    }

    #[test]
    fn test_audit_file_name() {
        assert_eq!(
            audit_file_name(Category::Rejected, at()),
            "rejected-20240309-070501.csv"
        );
    }

    #[test]
    fn test_write_category_header_and_rows() {
        let mut buffer = Vec::new();
        write_category(&[new_entry(1, "Ann"), new_entry(2, "Bo, Jr")], &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "id,name,lastname,card,email\n\
             1,Ann,Lee,100,a@x.com\n\
             2,\"Bo, Jr\",Lee,200,a@x.com\n"
        );
    }

    #[test]
    fn test_write_audit_files_skips_empty_categories() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("logs");

        let mut log = AuditLog::new();
        log.record(new_entry(1, "Ann"));
        log.record(AuditEntry::rejected(
            &RawLead::new(4, [(Field::Id, "x")]),
            "Validation field [id] Error: The id must be an integer.",
        ));

        let written = write_audit_files(&log, &dir, at()).unwrap();
        assert_eq!(
            written,
            vec![
                dir.join("rejected-20240309-070501.csv"),
                dir.join("new-20240309-070501.csv"),
            ]
        );

        let rejected = fs::read_to_string(&written[0]).unwrap();
        assert!(rejected.starts_with("id,name,lastname,card,email,error\n"));
        assert!(rejected.contains("The id must be an integer."));
    }

    #[test]
    fn test_empty_log_writes_nothing() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("logs");

        let written = write_audit_files(&AuditLog::new(), &dir, at()).unwrap();
        assert!(written.is_empty());
        assert!(!dir.exists());
    }
}
