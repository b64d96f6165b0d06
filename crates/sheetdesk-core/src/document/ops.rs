use super::Editor;
use crate::error::{Result, SheetdeskError};
use crate::table::{CellValue, Table};
use std::collections::BTreeSet;

/// Counts of what a delete removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub rows: usize,
    pub columns: usize,
}

/// Toggle `index` in `set`. Returns whether it is now a member.
fn toggle(set: &mut BTreeSet<usize>, index: usize) -> bool {
    if set.remove(&index) {
        false
    } else {
        set.insert(index);
        true
    }
}

impl Editor {
    fn table_mut(&mut self) -> Result<&mut Table> {
        self.table.as_mut().ok_or(SheetdeskError::NoTable)
    }

    /// Rename the column at `index`; row values follow by position.
    pub fn rename_column(&mut self, index: usize, new_name: &str) -> Result<()> {
        self.table_mut()?.rename_column(index, new_name)?;
        self.modified = true;
        Ok(())
    }

    /// Set a cell from user input. The value is always stored as text.
    pub fn edit_cell(&mut self, row: usize, column_name: &str, input: &str) -> Result<()> {
        self.table_mut()?
            .set_value(row, column_name, CellValue::text(input))?;
        self.modified = true;
        Ok(())
    }

    /// Toggle row `index` in the deletion selection. Returns whether it is now selected.
    pub fn toggle_row(&mut self, index: usize) -> bool {
        toggle(&mut self.selection.rows, index)
    }

    /// Toggle column `index` in the deletion selection. Returns whether it is now selected.
    pub fn toggle_column(&mut self, index: usize) -> bool {
        toggle(&mut self.selection.columns, index)
    }

    pub fn is_row_selected(&self, index: usize) -> bool {
        self.selection.rows.contains(&index)
    }

    pub fn is_column_selected(&self, index: usize) -> bool {
        self.selection.columns.contains(&index)
    }

    /// Remove the selected rows, then the selected columns (if any).
    ///
    /// The selection is cleared afterwards since its indices no longer refer
    /// to the same rows and columns.
    pub fn delete_selected(&mut self) -> Result<DeleteSummary> {
        let selection = std::mem::take(&mut self.selection);
        let table = self.table_mut()?;
        let rows = table.remove_rows(&selection.rows);
        let columns = if selection.columns.is_empty() {
            0
        } else {
            table.remove_columns(&selection.columns)
        };
        if rows > 0 || columns > 0 {
            self.modified = true;
        }
        log::info!("deleted {} rows and {} columns", rows, columns);
        Ok(DeleteSummary { rows, columns })
    }

    /// Append an empty row at the end of the table.
    pub fn append_row(&mut self) -> Result<()> {
        self.table_mut()?.push_row();
        self.modified = true;
        Ok(())
    }

    /// Append a column named `name`; existing rows get an empty cell.
    ///
    /// Fails with [`SheetdeskError::DuplicateColumn`] if the name is taken.
    pub fn append_column(&mut self, name: &str) -> Result<()> {
        self.table_mut()?.push_column(name)?;
        self.modified = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::sample_table;

    fn editor() -> Editor {
        let mut editor = Editor::new();
        editor.table = Some(sample_table());
        editor.title = "sample".to_string();
        editor
    }

    fn rows(editor: &Editor) -> Vec<Vec<String>> {
        editor
            .table()
            .unwrap()
            .rows()
            .iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_rename_column_positional_remap() {
        let mut editor = editor();
        editor.rename_column(0, "X").unwrap();
        let table = editor.table().unwrap();
        assert_eq!(table.column_names(), &["X", "B"]);
        assert_eq!(table.value(0, "X"), Some(&CellValue::Number(1.0)));
        assert_eq!(table.value(1, "X"), Some(&CellValue::Number(3.0)));
        assert!(editor.modified);
    }

    #[test]
    fn test_edit_cell_stores_text() {
        let mut editor = editor();
        editor.edit_cell(0, "B", "9").unwrap();
        let table = editor.table().unwrap();
        assert_eq!(table.value(0, "A"), Some(&CellValue::Number(1.0)));
        assert_eq!(table.value(0, "B"), Some(&CellValue::text("9")));
    }

    #[test]
    fn test_edit_without_table_is_error() {
        let mut editor = Editor::new();
        assert!(matches!(
            editor.edit_cell(0, "A", "x"),
            Err(SheetdeskError::NoTable)
        ));
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut editor = editor();
        editor.toggle_row(3);
        let before = editor.selection().clone();
        assert!(editor.toggle_row(1));
        assert!(!editor.toggle_row(1));
        assert_eq!(editor.selection(), &before);
    }

    #[test]
    fn test_delete_selected_rows_only() {
        let mut editor = editor();
        editor.toggle_row(1);
        let summary = editor.delete_selected().unwrap();
        assert_eq!(summary, DeleteSummary { rows: 1, columns: 0 });
        assert_eq!(rows(&editor), vec![vec!["1", "2"]]);
        assert_eq!(editor.table().unwrap().column_names(), &["A", "B"]);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_delete_selected_columns_only() {
        let mut editor = editor();
        editor.toggle_column(1);
        editor.delete_selected().unwrap();
        assert_eq!(editor.table().unwrap().column_names(), &["A"]);
        assert_eq!(rows(&editor), vec![vec!["1"], vec!["3"]]);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_delete_rows_and_columns_together() {
        let mut editor = editor();
        editor.toggle_row(0);
        editor.toggle_column(0);
        let summary = editor.delete_selected().unwrap();
        assert_eq!(summary, DeleteSummary { rows: 1, columns: 1 });
        assert_eq!(rows(&editor), vec![vec!["4"]]);
        assert!(editor.table().unwrap().is_consistent());
    }

    #[test]
    fn test_delete_with_empty_selection_changes_nothing() {
        let mut editor = editor();
        let summary = editor.delete_selected().unwrap();
        assert_eq!(summary, DeleteSummary::default());
        assert!(!editor.modified);
        assert_eq!(editor.table(), Some(&sample_table()));
    }

    #[test]
    fn test_append_row_and_column() {
        let mut editor = editor();
        editor.append_column("C").unwrap();
        editor.append_row().unwrap();
        editor.edit_cell(2, "C", "new").unwrap();
        let table = editor.table().unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.value(2, "C"), Some(&CellValue::text("new")));
        assert!(table.is_consistent());
    }

    #[test]
    fn test_append_existing_column_name_fails() {
        let mut editor = editor();
        assert!(matches!(
            editor.append_column("B"),
            Err(SheetdeskError::DuplicateColumn(_))
        ));
        assert!(!editor.modified);
        assert_eq!(editor.table(), Some(&sample_table()));
    }
}
