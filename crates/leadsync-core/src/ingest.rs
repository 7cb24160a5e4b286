//! Input discovery and CSV ingestion
//!
//! Header names are trimmed and lower-cased, then mapped to canonical fields
//! through a fixed table. Any header outside the table fails the whole run.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{Field, RawLead};

/// Normalized header name -> canonical field
const HEADER_MAP: [(&str, Field); 5] = [
    ("identifier", Field::Id),
    ("name", Field::Name),
    ("last name", Field::Lastname),
    ("card", Field::Card),
    ("email", Field::Email),
];

/// Trim and lower-case a header cell
#[must_use]
pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Map a raw header cell to its canonical field
#[must_use]
pub fn map_header(header: &str) -> Option<Field> {
    let normalized = normalize_header(header);
    HEADER_MAP
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, field)| *field)
}

/// Find the input snapshot inside `dir`.
///
/// Picks the lexicographically first regular file with a `.csv` extension.
/// A missing directory is not an error: there is simply nothing to process.
pub fn discover_input(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Input directory {} does not exist", dir.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && has_csv_extension(&path) {
            candidates.push(path);
        }
    }
    candidates.sort();

    Ok(candidates.into_iter().next())
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Read leads from a CSV file
pub fn read_leads_from_path(path: &Path) -> Result<Vec<RawLead>> {
    let file = File::open(path)?;
    read_leads(file)
}

/// Read leads from comma-delimited input with a header row.
///
/// Rows are padded or truncated to the header width, cells are trimmed and
/// rows with no content at all are skipped.
pub fn read_leads<R: Read>(input: R) -> Result<Vec<RawLead>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let columns = map_headers(reader.headers()?)?;

    let mut leads = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let lead = RawLead::new(
            index + 1,
            columns
                .iter()
                .enumerate()
                .map(|(column, field)| (*field, record.get(column).unwrap_or("").trim())),
        );

        if lead.is_blank() {
            continue;
        }
        leads.push(lead);
    }

    tracing::debug!("Ingested {} lead rows", leads.len());
    Ok(leads)
}

/// Resolve each header cell to a field, checking the mapping is exhaustive
fn map_headers(headers: &csv::StringRecord) -> Result<Vec<Field>> {
    let mut columns = Vec::with_capacity(headers.len());

    for header in headers {
        let field = map_header(header).ok_or_else(|| {
            Error::Schema(format!("unmapped header '{}'", normalize_header(header)))
        })?;
        if columns.contains(&field) {
            return Err(Error::Schema(format!(
                "header '{}' appears more than once",
                normalize_header(header)
            )));
        }
        columns.push(field);
    }

    let missing = HEADER_MAP
        .iter()
        .filter(|(_, field)| !columns.contains(field))
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(Error::Schema(format!(
            "missing required header(s): {}",
            missing.join(", ")
        )));
    }

    Ok(columns)
}
