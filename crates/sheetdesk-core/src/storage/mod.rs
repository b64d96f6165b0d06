//! Spreadsheet file formats.

pub mod xlsx;

pub use xlsx::{
    EXPORT_SHEET_NAME, XLSX_MIME, parse_xlsx, read_xlsx, write_xlsx, write_xlsx_bytes,
};
