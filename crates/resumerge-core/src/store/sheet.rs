//! CSV-backed record table.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{RecordStore, Result};
use crate::error::StoreError;
use crate::models::record::{Field, ResumeRecord};

/// A flat table on disk: header row of field names, one row per record,
/// empty cell for unknown values.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    delimiter: u8,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn columns(headers: &csv::StringRecord) -> Result<Vec<Field>> {
        let mut seen = HashSet::new();
        headers
            .iter()
            .map(|h| {
                let field =
                    Field::from_header(h).ok_or_else(|| StoreError::UnknownColumn(h.to_string()))?;
                if !seen.insert(field) {
                    return Err(StoreError::Corrupt(format!("duplicate column {}", h)));
                }
                Ok(field)
            })
            .collect()
    }
}

impl RecordStore for CsvStore {
    fn load(&self) -> Result<Option<Vec<ResumeRecord>>> {
        if !self.path.exists() {
            info!("No store at {}, starting empty", self.path.display());
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            debug!("Store {} is empty", self.path.display());
            return Ok(Some(Vec::new()));
        }
        let columns = Self::columns(&headers)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut record = ResumeRecord::new();
            for (field, cell) in columns.iter().zip(row.iter()) {
                if !cell.is_empty() {
                    record.set(*field, Some(cell.to_string()));
                }
            }
            records.push(record);
        }

        info!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(Some(records))
    }

    fn save(&self, records: &[ResumeRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write next to the target, then rename over it
        let temp_path = self.path.with_extension("tmp");
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&temp_path)?;

        writer.write_record(Field::ALL.iter().map(|f| f.as_str()))?;
        for record in records {
            writer.write_record(record.iter().map(|(_, v)| v.unwrap_or("")))?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, &self.path)?;

        info!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}
