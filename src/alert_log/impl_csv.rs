use crate::alert_log::alert_record::{AlertRecord, AlertTable, HEADER};
use crate::alert_log::interface::{AlertLog, AlertLogError};
use crate::library::logger::interface::Logger;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// `Time,Animal,Confidence,Image` CSV file.
pub struct AlertLogCsv {
    path: PathBuf,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl AlertLogCsv {
    pub fn new(path: impl Into<PathBuf>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            path: path.into(),
            logger: logger.with_namespace("alert_log"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> AlertLogError {
        AlertLogError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> AlertLogError {
        AlertLogError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    fn read_table(&self) -> Result<AlertTable, AlertLogError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AlertTable::default()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| self.csv_error(e))?.clone();

        // A zero-byte file carries no header at all; treat it like a missing log.
        if headers.is_empty() {
            return Ok(AlertTable::default());
        }

        if headers.iter().ne(HEADER.iter().copied()) {
            return Err(AlertLogError::UnexpectedHeader {
                path: self.path.clone(),
                found: headers.iter().map(str::to_string).collect(),
                expected: HEADER.iter().map(|h| h.to_string()).collect(),
            });
        }

        let rows = reader
            .deserialize()
            .collect::<Result<Vec<AlertRecord>, csv::Error>>()
            .map_err(|e| self.csv_error(e))?;

        Ok(AlertTable { rows })
    }

    fn write_table(&self, table: &AlertTable) -> Result<(), AlertLogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        // Header is written by hand so an empty table still gets one.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|e| self.csv_error(e))?;

        writer.write_record(HEADER).map_err(|e| self.csv_error(e))?;
        for row in &table.rows {
            writer.serialize(row).map_err(|e| self.csv_error(e))?;
        }
        writer.flush().map_err(|e| self.io_error(e))?;

        Ok(())
    }
}

impl AlertLog for AlertLogCsv {
    fn initialize(&self) -> Result<(), AlertLogError> {
        if self.path.exists() {
            return Ok(());
        }
        let _ = self
            .logger
            .info(&format!("Creating {}", self.path.display()));
        self.write_table(&AlertTable::default())
    }

    fn load(&self) -> Result<AlertTable, AlertLogError> {
        self.read_table()
    }

    fn append(&self, record: AlertRecord) -> Result<(), AlertLogError> {
        let mut table = self.read_table()?;
        let _ = self.logger.info(&format!(
            "Appending {} ({}) as row {}",
            record.animal,
            record.confidence,
            table.len() + 1
        ));
        table.rows.push(record);
        self.write_table(&table)
    }

    fn clear(&self) -> Result<(), AlertLogError> {
        let _ = self.logger.info("Clearing all alerts");
        self.write_table(&AlertTable::default())
    }
}
