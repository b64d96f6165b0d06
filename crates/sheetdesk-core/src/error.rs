//! Error types for sheetdesk core.

use thiserror::Error;

/// Errors that can occur while editing, encoding or transferring a sheet
#[derive(Error, Debug)]
pub enum SheetdeskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet read error: {0}")]
    SheetRead(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    SheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook contains no worksheets")]
    NoWorksheets,

    #[error("Sheet has no data rows, column names cannot be derived")]
    EmptySheet,

    #[error("No table loaded")]
    NoTable,

    #[error("Row {index} out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Column {index} out of range ({len} columns)")]
    ColumnOutOfRange { index: usize, len: usize },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column already exists: {0}")]
    DuplicateColumn(String),

    #[error("Table too large for a worksheet ({rows} rows, {cols} columns)")]
    TooLarge { rows: usize, cols: usize },

    #[error("Backend request failed ({action}): {message}")]
    Backend {
        action: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, SheetdeskError>;
