//! sheetdesk-core - UI-agnostic table model, editor session, sheet catalog and storage.

pub mod catalog;
pub mod document;
pub mod error;
pub mod storage;
pub mod table;

pub use catalog::{SheetBackend, SheetList, SheetRecord};
pub use document::{DeleteSummary, Editor, SaveOutcome, Selection};
pub use error::{Result, SheetdeskError};
pub use table::{CellValue, Table};
