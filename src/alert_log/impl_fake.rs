use crate::alert_log::alert_record::{AlertRecord, AlertTable};
use crate::alert_log::interface::{AlertLog, AlertLogError};
use std::sync::{Mutex, MutexGuard};

/// In-memory log.
#[derive(Default)]
pub struct AlertLogFake {
    table: Mutex<AlertTable>,
}

impl AlertLogFake {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, AlertTable> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AlertLog for AlertLogFake {
    fn initialize(&self) -> Result<(), AlertLogError> {
        Ok(())
    }

    fn load(&self) -> Result<AlertTable, AlertLogError> {
        Ok(self.table().clone())
    }

    fn append(&self, record: AlertRecord) -> Result<(), AlertLogError> {
        self.table().rows.push(record);
        Ok(())
    }

    fn clear(&self) -> Result<(), AlertLogError> {
        self.table().rows.clear();
        Ok(())
    }
}
