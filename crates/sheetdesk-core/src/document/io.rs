use super::{Editor, Selection};
use crate::catalog::SheetBackend;
use crate::error::{Result, SheetdeskError};
use crate::storage::{parse_xlsx, write_xlsx, write_xlsx_bytes};
use std::path::{Path, PathBuf};

/// Title used when the user cleared the title field.
const FALLBACK_TITLE: &str = "Sheet1";

/// Result of submitting the table to the backend.
///
/// Saving always ends the editing session, whether or not the upload went through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveOutcome {
    /// File name the workbook was submitted under
    pub file_name: String,
    /// Whether the backend acknowledged the upload
    pub uploaded: bool,
}

/// Strip the extension from a file name: `budget.2024.xlsx` -> `budget.2024`.
pub(crate) fn title_from_file_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[..idx].to_string(),
        _ => file_name.to_string(),
    }
}

impl Editor {
    /// Import spreadsheet bytes, replacing the whole session.
    ///
    /// On error (unreadable workbook, sheet without data rows) the current
    /// session is left untouched.
    pub fn import_bytes(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        let table = parse_xlsx(bytes)?;
        log::info!(
            "imported {} ({} rows, {} columns)",
            file_name,
            table.row_count(),
            table.column_count()
        );
        self.table = Some(table);
        self.title = title_from_file_name(file_name);
        self.selection = Selection::default();
        self.modified = false;
        Ok(())
    }

    /// Import a spreadsheet file from disk.
    pub fn import_file(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.import_bytes(&file_name, bytes)
    }

    /// File name used for export and upload: `<title>.xlsx`.
    pub fn export_file_name(&self) -> String {
        let title = self.title.trim();
        let title = if title.is_empty() {
            FALLBACK_TITLE
        } else {
            title
        };
        format!("{}.xlsx", title)
    }

    /// Encode the table as xlsx bytes.
    pub fn export_bytes(&self) -> Result<Vec<u8>> {
        let table = self.table.as_ref().ok_or(SheetdeskError::NoTable)?;
        write_xlsx_bytes(table)
    }

    /// Write `<title>.xlsx` into `dir`. Returns the written path.
    pub fn export_to_dir(&mut self, dir: &Path) -> Result<PathBuf> {
        let file_name = self.export_file_name().replace(['/', '\\'], "_");
        let path = dir.join(file_name);
        self.export_to_path(&path)?;
        Ok(path)
    }

    /// Write the table to an explicit path.
    pub fn export_to_path(&mut self, path: &Path) -> Result<()> {
        let table = self.table.as_ref().ok_or(SheetdeskError::NoTable)?;
        write_xlsx(path, table)?;
        self.selection.clear();
        log::info!("exported to {}", path.display());
        Ok(())
    }

    /// Encode the table and upload it to the backend.
    ///
    /// Failures are logged only; the caller leaves the editor either way.
    pub fn save(&mut self, backend: &dyn SheetBackend) -> SaveOutcome {
        let file_name = self.export_file_name();
        self.selection.clear();

        let uploaded = match self
            .export_bytes()
            .and_then(|bytes| backend.upload_sheet(&file_name, bytes))
        {
            Ok(ack) => {
                log::info!("Upload successful: {}", ack);
                self.modified = false;
                true
            }
            Err(e) => {
                log::error!("Upload error: {}", e);
                false
            }
        };

        SaveOutcome {
            file_name,
            uploaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fake::FakeBackend;
    use crate::table::{CellValue, Table, keyed, sample_table};

    fn sample_bytes() -> Vec<u8> {
        write_xlsx_bytes(&sample_table()).unwrap()
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sheetdesk_{}_{}_{}_{:?}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            std::thread::current().id(),
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    struct Cleanup(PathBuf);
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_title_from_file_name() {
        assert_eq!(title_from_file_name("budget.xlsx"), "budget");
        assert_eq!(title_from_file_name("budget.2024.xls"), "budget.2024");
        assert_eq!(title_from_file_name("noext"), "noext");
        assert_eq!(title_from_file_name(".hidden"), ".hidden");
    }

    #[test]
    fn test_import_sets_table_and_title() {
        let mut editor = Editor::new();
        editor.import_bytes("people.xlsx", sample_bytes()).unwrap();
        let table = editor.table().unwrap();
        assert_eq!(table.column_names(), &["A", "B"]);
        assert_eq!(table.value(1, "B"), Some(&CellValue::Number(4.0)));
        assert_eq!(editor.title, "people");
        assert!(!editor.modified);
    }

    #[test]
    fn test_import_resets_selection_and_replaces_table() {
        let mut editor = Editor::new();
        editor.import_bytes("one.xlsx", sample_bytes()).unwrap();
        editor.toggle_row(0);
        editor.toggle_column(1);

        let other = Table::from_keyed_rows(vec![keyed(&[("Z", "z".into())])]).unwrap();
        editor
            .import_bytes("two.xlsx", write_xlsx_bytes(&other).unwrap())
            .unwrap();
        assert!(editor.selection().is_empty());
        assert_eq!(editor.table().unwrap().column_names(), &["Z"]);
        assert_eq!(editor.title, "two");
    }

    #[test]
    fn test_failed_import_keeps_session() {
        let mut editor = Editor::new();
        editor.import_bytes("one.xlsx", sample_bytes()).unwrap();
        editor.toggle_row(1);

        assert!(editor.import_bytes("bad.xlsx", b"junk".to_vec()).is_err());
        assert_eq!(editor.title, "one");
        assert!(editor.is_row_selected(1));
        assert_eq!(editor.table(), Some(&sample_table()));
    }

    #[test]
    fn test_export_round_trip_through_file() {
        let dir = temp_dir("export");
        let _cleanup = Cleanup(dir.clone());

        let mut editor = Editor::new();
        editor.import_bytes("grades.xlsx", sample_bytes()).unwrap();
        editor.rename_column(0, "X").unwrap();
        editor.edit_cell(1, "B", "seven").unwrap();
        editor.toggle_row(0);

        let path = editor.export_to_dir(&dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "grades.xlsx");
        assert!(editor.selection().is_empty());

        let mut reopened = Editor::new();
        reopened.import_file(&path).unwrap();
        let table = reopened.table().unwrap();
        assert_eq!(table.column_names(), &["X", "B"]);
        assert_eq!(table.value(0, "X").unwrap().to_string(), "1");
        assert_eq!(table.value(1, "B").unwrap().to_string(), "seven");
    }

    #[test]
    fn test_export_file_name_falls_back_when_title_blank() {
        let mut editor = Editor::new();
        editor.title = "   ".to_string();
        assert_eq!(editor.export_file_name(), "Sheet1.xlsx");
        editor.title = "report".to_string();
        assert_eq!(editor.export_file_name(), "report.xlsx");
    }

    #[test]
    fn test_save_uploads_under_title() {
        let backend = FakeBackend::default();
        let mut editor = Editor::new();
        editor.import_bytes("q3.xlsx", sample_bytes()).unwrap();
        editor.title = "q3-final".to_string();
        editor.toggle_column(0);

        let outcome = editor.save(&backend);
        assert!(outcome.uploaded);
        assert_eq!(outcome.file_name, "q3-final.xlsx");
        assert!(editor.selection().is_empty());

        let uploads = backend.uploads.borrow();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "q3-final.xlsx");
        let table = parse_xlsx(uploads[0].1.clone()).unwrap();
        assert_eq!(table.column_names(), &["A", "B"]);
    }

    #[test]
    fn test_save_failure_still_reports_outcome() {
        let backend = FakeBackend::failing();
        let mut editor = Editor::new();
        editor.import_bytes("q3.xlsx", sample_bytes()).unwrap();

        let outcome = editor.save(&backend);
        assert!(!outcome.uploaded);
        assert_eq!(outcome.file_name, "q3.xlsx");
        assert_eq!(backend.uploads.borrow().len(), 1);
    }

    #[test]
    fn test_save_without_table_does_not_upload() {
        let backend = FakeBackend::default();
        let mut editor = Editor::new();
        let outcome = editor.save(&backend);
        assert!(!outcome.uploaded);
        assert!(backend.uploads.borrow().is_empty());
    }
}
