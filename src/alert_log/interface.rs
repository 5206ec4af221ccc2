use crate::alert_log::alert_record::{AlertRecord, AlertTable};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AlertLogError {
    #[error("alert log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("alert log {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("alert log {path} has header {found:?}, expected {expected:?}")]
    UnexpectedHeader {
        path: PathBuf,
        found: Vec<String>,
        expected: Vec<String>,
    },
}

/// Shared log between the capture and monitoring pages.
///
/// Appends are read-modify-write of the whole log and are not atomic: two
/// writers racing can lose a row. Only one operator is expected.
pub trait AlertLog: Send + Sync {
    /// Creates a header-only log if none exists; leaves an existing one alone.
    fn initialize(&self) -> Result<(), AlertLogError>;

    /// A missing log loads as an empty table.
    fn load(&self) -> Result<AlertTable, AlertLogError>;

    fn append(&self, record: AlertRecord) -> Result<(), AlertLogError>;

    /// Truncates to the header-only state.
    fn clear(&self) -> Result<(), AlertLogError>;
}
