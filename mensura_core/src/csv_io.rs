//! CSV export and import of the measurement log.
//!
//! Export writes the whole log atomically; import validates every row and
//! skips the ones that fail.

use crate::{Error, MeasurementRecord, NewMeasurement, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, Serialize)]
struct ExportRow {
    id: u64,
    date: String,
    weight: f64,
    waist: f64,
    chest: f64,
}

impl From<&MeasurementRecord> for ExportRow {
    fn from(record: &MeasurementRecord) -> Self {
        ExportRow {
            id: record.id,
            date: record.date.format("%Y-%m-%d").to_string(),
            weight: record.weight,
            waist: record.waist,
            chest: record.chest,
        }
    }
}

/// A row accepted on import; an `id` column, if present, is ignored
#[derive(Debug, Deserialize)]
struct ImportRow {
    date: String,
    weight: f64,
    waist: f64,
    chest: f64,
}

impl TryFrom<ImportRow> for NewMeasurement {
    type Error = Error;

    fn try_from(row: ImportRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
            .map_err(|e| Error::Validation(format!("Invalid date {:?}: {}", row.date, e)))?;
        NewMeasurement::new(date, row.weight, row.waist, row.chest)
    }
}

/// Outcome of reading a CSV file
#[derive(Debug, Default)]
pub struct CsvImport {
    pub measurements: Vec<NewMeasurement>,
    pub skipped: usize,
}

/// Write every record to `path`, replacing it atomically
///
/// The rows go to a temp file in the same directory, which is synced and then
/// renamed over the destination. Returns the number of rows written.
pub fn export_csv(records: &[MeasurementRecord], path: &Path) -> Result<usize> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::Writer::from_writer(temp.as_file());
        for record in records {
            writer.serialize(ExportRow::from(record))?;
        }
        // An empty export still gets a header
        if records.is_empty() {
            writer.write_record(["id", "date", "weight", "waist", "chest"])?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} measurements to {:?}", records.len(), path);
    Ok(records.len())
}

/// Read measurements from a CSV file with a header row
pub fn import_csv(path: &Path) -> Result<CsvImport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut import = CsvImport::default();
    for (index, result) in reader.deserialize::<ImportRow>().enumerate() {
        let row_num = index + 2;
        match result {
            Ok(row) => match NewMeasurement::try_from(row) {
                Ok(m) => import.measurements.push(m),
                Err(e) => {
                    tracing::warn!("Skipping CSV row {}: {}", row_num, e);
                    import.skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row {}: {}", row_num, e);
                import.skipped += 1;
            }
        }
    }

    tracing::info!(
        "Read {} measurements from {:?} ({} skipped)",
        import.measurements.len(),
        path,
        import.skipped
    );
    Ok(import)
}
