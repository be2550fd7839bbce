//! Measurement log persistence.
//!
//! Records are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Ids are assigned under the write lock.

use crate::{Error, MeasurementRecord, NewMeasurement, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// File name of the log inside the data directory
pub const LOG_FILE_NAME: &str = "mesures.jsonl";

/// Append-only measurement log with read-all access
pub trait MeasurementLog {
    /// Persist a measurement and return it with its assigned id
    fn append(&mut self, measurement: NewMeasurement) -> Result<MeasurementRecord>;

    /// Every stored record, ascending by date (ties by id)
    fn list_all(&self) -> Result<Vec<MeasurementRecord>>;
}

/// JSONL-backed measurement log with file locking
pub struct JsonlLog {
    path: PathBuf,
}

impl JsonlLog {
    /// Create a log for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log stored in the standard file under `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(LOG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::storage(parent, e))?;
        }
        Ok(())
    }
}

impl MeasurementLog for JsonlLog {
    fn append(&mut self, measurement: NewMeasurement) -> Result<MeasurementRecord> {
        self.ensure_parent_dir()?;
        let storage = |e| Error::storage(&self.path, e);

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(storage)?;

        // Held across the id scan and the write so concurrent appenders
        // cannot hand out the same id
        file.lock_exclusive().map_err(storage)?;

        let contents = read_contents(&file, &self.path)?;
        let next_id = parse_records(&contents)
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(0)
            + 1;
        let record = measurement.into_record(next_id);

        let mut writer = BufWriter::new(&file);
        // Terminate a torn trailing line so the new record starts cleanly
        if !contents.is_empty() && !contents.ends_with('\n') {
            writer.write_all(b"\n").map_err(storage)?;
        }
        let line = serde_json::to_string(&record)?;
        writer.write_all(line.as_bytes()).map_err(storage)?;
        writer.write_all(b"\n").map_err(storage)?;
        writer.flush().map_err(storage)?;
        drop(writer);

        file.unlock().map_err(storage)?;

        tracing::debug!("Appended measurement {} for {} to log", record.id, record.date);
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<MeasurementRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let storage = |e| Error::storage(&self.path, e);

        let file = File::open(&self.path).map_err(storage)?;
        file.lock_shared().map_err(storage)?;
        let contents = read_contents(&file, &self.path)?;
        file.unlock().map_err(storage)?;

        let mut records = parse_records(&contents);

        records.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        tracing::debug!("Read {} measurements from log", records.len());
        Ok(records)
    }
}

fn read_contents(mut file: &File, path: &Path) -> Result<String> {
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| Error::storage(path, e))?;
    Ok(contents)
}

/// Parse every well-formed line; malformed lines are skipped with a warning
fn parse_records(contents: &str) -> Vec<MeasurementRecord> {
    let mut records = Vec::new();

    for (line_num, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<MeasurementRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse measurement at line {}: {}", line_num + 1, e);
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn measurement(y: i32, m: u32, d: u32, weight: f64) -> NewMeasurement {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        NewMeasurement::new(date, weight, 85.0, 100.0).unwrap()
    }

    #[test]
    fn test_append_and_read_single_record() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlLog::in_dir(temp_dir.path());

        let stored = log.append(measurement(2024, 1, 1, 80.0)).unwrap();
        assert_eq!(stored.id, 1);

        let records = log.list_all().unwrap();
        assert_eq!(records, vec![stored]);
    }

    #[test]
    fn test_ids_auto_increment() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlLog::in_dir(temp_dir.path());

        let ids: Vec<u64> = (1..=4)
            .map(|d| log.append(measurement(2024, 2, d, 75.0)).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_list_all_sorted_by_date() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlLog::in_dir(temp_dir.path());

        log.append(measurement(2024, 1, 15, 78.0)).unwrap();
        log.append(measurement(2024, 1, 1, 80.0)).unwrap();
        log.append(measurement(2024, 1, 8, 79.0)).unwrap();
        log.append(measurement(2024, 1, 1, 80.5)).unwrap();

        let records = log.list_all().unwrap();
        let order: Vec<(u32, u64)> = records
            .iter()
            .map(|r| (chrono::Datelike::day(&r.date), r.id))
            .collect();
        assert_eq!(order, vec![(1, 2), (1, 4), (8, 3), (15, 1)]);
    }

    #[test]
    fn test_read_missing_log_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = JsonlLog::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(log.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupted_lines_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlLog::in_dir(temp_dir.path());
        log.append(measurement(2024, 1, 1, 80.0)).unwrap();

        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file, "{{ not json").unwrap();
        drop(file);

        let next = log.append(measurement(2024, 1, 2, 79.5)).unwrap();
        assert_eq!(next.id, 2);
        assert_eq!(log.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_append_after_torn_line() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlLog::in_dir(temp_dir.path());
        log.append(measurement(2024, 1, 1, 80.0)).unwrap();

        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        write!(file, "{{\"id\":2,\"da").unwrap();
        drop(file);

        let next = log.append(measurement(2024, 1, 3, 79.0)).unwrap();
        assert_eq!(next.id, 2);
        let records = log.list_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], next);
    }

    #[test]
    fn test_line_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlLog::in_dir(temp_dir.path());
        log.append(measurement(2024, 1, 1, 80.0)).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "{\"id\":1,\"date\":\"2024-01-01\",\"weight\":80.0,\"waist\":85.0,\"chest\":100.0}\n"
        );
    }
}
