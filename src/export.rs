// src/export.rs
// =============================================================================
// CSV export of the collected records.
//
// Columns, in this order:
//   name, email, phone, comuna, localidad, region,
//   registration_type, specialties, status, detail_url
//
// Absent values become empty cells. specialties is written as a JSON array
// ("[]" when there are none) so a single cell can hold the whole list.
// =============================================================================

use crate::error::Result;
use crate::record::GuideRecord;
// serde derives the CSV header and row layout from ExportRow's fields
use serde::Serialize;
// Generic over Write so tests can write into a Vec<u8> instead of a file
use std::io::Write;
use std::path::Path;
use tracing::info;

// One flattened CSV row; field order is column order
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    comuna: Option<&'a str>,
    localidad: Option<&'a str>,
    region: Option<&'a str>,
    registration_type: Option<&'a str>,
    specialties: String,
    status: Option<&'a str>,
    detail_url: &'a str,
}

impl<'a> ExportRow<'a> {
    fn from_record(record: &'a GuideRecord) -> Result<Self> {
        Ok(Self {
            name: record.personal_info.name.as_deref(),
            email: record.personal_info.email.as_deref(),
            phone: record.personal_info.phone.as_deref(),
            comuna: record.location.comuna.as_deref(),
            localidad: record.location.localidad.as_deref(),
            region: record.location.region.as_deref(),
            registration_type: record.registration.kind.as_deref(),
            specialties: serde_json::to_string(&record.registration.specialties)?,
            status: record.registration.status.as_deref(),
            detail_url: &record.detail_url,
        })
    }
}

// Writes records as CSV (with header) to any writer
pub fn write_csv<W: Write>(records: &[GuideRecord], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    if records.is_empty() {
        // serialize() only emits the header together with the first row
        out.write_record([
            "name",
            "email",
            "phone",
            "comuna",
            "localidad",
            "region",
            "registration_type",
            "specialties",
            "status",
            "detail_url",
        ])?;
    }

    for record in records {
        out.serialize(ExportRow::from_record(record)?)?;
    }

    // csv::Writer buffers internally; flush so errors surface here
    out.flush()?;
    Ok(())
}

// Writes records to a CSV file, creating parent directories as needed
pub fn save_csv(records: &[GuideRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    write_csv(records, file)?;

    info!("Saved {} record(s) to {}", records.len(), path.display());
    Ok(())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a separate ExportRow struct?
//    - GuideRecord is nested (personal_info, location, registration)
//    - CSV is flat, so we borrow each field into one flat row
//    - The 'a lifetime says: the row cannot outlive the record it borrows from
//
// 2. How does Option become an empty cell?
//    - The csv crate writes None as an empty field
//    - No manual unwrap_or("") needed
//
// 3. Why not write the CSV by hand with format!?
//    - Names and specialties can contain commas and quotes
//    - The csv crate quotes and escapes them correctly
// -----------------------------------------------------------------------------
