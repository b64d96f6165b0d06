//! Application state and logic.
//!
//! [`App`] holds both screens: the sheet list (records stored on the backend)
//! and the sheet editor (one imported table). Only one screen is active at a
//! time; input goes through a one-line prompt for anything that needs text.

use sheetdesk_core::{Editor, SheetBackend, SheetList};
use std::path::{Path, PathBuf};

/// Which screen is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    List,
    Editor,
}

/// Input mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Navigate and trigger single-key actions.
    Normal,
    /// Type into the prompt line.
    Prompt,
}

/// What the prompt line is collecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    ImportPath,
    EditCell,
    RenameColumn,
    Title,
    AddColumn,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::ImportPath => "Import file",
            PromptKind::EditCell => "Cell",
            PromptKind::RenameColumn => "Rename column",
            PromptKind::Title => "Title",
            PromptKind::AddColumn => "New column",
        }
    }
}

/// Main application state container.
pub struct App {
    pub screen: Screen,
    pub mode: Mode,
    pub prompt: Option<PromptKind>,
    /// Prompt input
    pub input_buffer: String,
    /// Cursor position within the prompt input (byte offset)
    pub input_cursor: usize,

    /// Records stored on the backend
    pub list: SheetList,
    /// Highlighted record
    pub list_cursor: usize,
    /// A fetch is due once the loading state has been drawn
    pub needs_refresh: bool,

    /// Current editing session
    pub editor: Editor,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub viewport_row: usize,
    pub viewport_col: usize,
    pub visible_rows: usize,
    pub visible_cols: usize,
    /// Column width for display
    pub col_width: usize,

    /// Status message to display
    pub status_message: String,

    backend: Box<dyn SheetBackend>,
    download_dir: PathBuf,
}

impl App {
    pub fn new(backend: Box<dyn SheetBackend>, download_dir: PathBuf) -> Self {
        App {
            screen: Screen::List,
            mode: Mode::Normal,
            prompt: None,
            input_buffer: String::new(),
            input_cursor: 0,
            list: SheetList::new(),
            list_cursor: 0,
            needs_refresh: true,
            editor: Editor::new(),
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            viewport_col: 0,
            visible_rows: 20,
            visible_cols: 6,
            col_width: 14,
            status_message: String::new(),
            backend,
            download_dir,
        }
    }

    // ----- Sheet list -----

    /// Switch to the list and schedule a fetch. Drops the editing session.
    pub fn show_list(&mut self) {
        self.screen = Screen::List;
        self.mode = Mode::Normal;
        self.prompt = None;
        self.editor.reset();
        self.list.begin_loading();
        self.needs_refresh = true;
    }

    pub fn refresh_list(&mut self) {
        self.needs_refresh = false;
        self.list.refresh(self.backend.as_ref());
        self.clamp_list_cursor();
    }

    fn clamp_list_cursor(&mut self) {
        let len = self.list.records().len();
        if self.list_cursor >= len {
            self.list_cursor = len.saturating_sub(1);
        }
    }

    pub fn delete_current_record(&mut self) {
        let Some(record) = self.list.records().get(self.list_cursor).cloned() else {
            return;
        };
        if self.list.delete(&record.id, self.backend.as_ref()) {
            self.status_message = format!("Deleted {}", record.filename);
        } else {
            self.status_message = format!("Error: could not delete {}", record.filename);
        }
        self.clamp_list_cursor();
    }

    pub fn download_current_record(&mut self) {
        let Some(record) = self.list.records().get(self.list_cursor).cloned() else {
            return;
        };
        // Keep only the final path component of the stored name.
        let file_name = Path::new(&record.filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.xlsx", record.id));
        let path = self.download_dir.join(file_name);

        let result = self
            .backend
            .download(&record.url)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(Into::into));
        match result {
            Ok(()) => {
                log::info!("downloaded {} to {}", record.url, path.display());
                self.status_message = format!("Downloaded to {}", path.display());
            }
            Err(e) => {
                log::error!("Error downloading {}: {}", record.url, e);
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    // ----- Sheet editor -----

    /// Switch to an empty editor.
    pub fn open_editor(&mut self) {
        self.screen = Screen::Editor;
        self.mode = Mode::Normal;
        self.needs_refresh = false;
        self.editor.reset();
        self.reset_grid_cursor();
    }

    fn reset_grid_cursor(&mut self) {
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.viewport_row = 0;
        self.viewport_col = 0;
    }

    pub fn row_count(&self) -> usize {
        self.editor.table().map_or(0, |t| t.row_count())
    }

    pub fn column_count(&self) -> usize {
        self.editor.table().map_or(0, |t| t.column_count())
    }

    fn current_column_name(&self) -> Option<String> {
        self.editor
            .table()
            .and_then(|t| t.column_names().get(self.cursor_col).cloned())
    }

    /// Import `path` into the editor, reporting the outcome in the status line.
    pub fn import_path(&mut self, path: &Path) {
        match self.editor.import_file(path) {
            Ok(()) => {
                self.reset_grid_cursor();
                self.status_message = format!(
                    "Imported {} ({} rows)",
                    path.display(),
                    self.row_count()
                );
            }
            Err(e) => {
                log::error!("Error importing {}: {}", path.display(), e);
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    pub fn toggle_row(&mut self) {
        if self.row_count() > 0 {
            self.editor.toggle_row(self.cursor_row);
        }
    }

    pub fn toggle_column(&mut self) {
        if self.column_count() > 0 {
            self.editor.toggle_column(self.cursor_col);
        }
    }

    pub fn delete_selected(&mut self) {
        if self.editor.selection().is_empty() {
            self.status_message = "Nothing selected".to_string();
            return;
        }
        match self.editor.delete_selected() {
            Ok(summary) => {
                self.status_message = format!(
                    "Deleted {} rows, {} columns",
                    summary.rows, summary.columns
                );
                self.clamp_grid_cursor();
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    pub fn append_row(&mut self) {
        match self.editor.append_row() {
            Ok(()) => {
                self.cursor_row = self.row_count().saturating_sub(1);
                self.update_viewport();
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    pub fn export(&mut self) {
        match self.editor.export_to_dir(&self.download_dir) {
            Ok(path) => self.status_message = format!("Exported to {}", path.display()),
            Err(e) => {
                log::error!("Error exporting: {}", e);
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Upload the table, then return to the list whatever the outcome.
    pub fn save(&mut self) {
        if !self.editor.has_table() {
            self.status_message = "Error: no table to save".to_string();
            return;
        }
        let outcome = self.editor.save(self.backend.as_ref());
        self.show_list();
        self.status_message = if outcome.uploaded {
            format!("Saved {}", outcome.file_name)
        } else {
            format!("Error: upload of {} failed", outcome.file_name)
        };
    }

    // ----- Prompt -----

    /// Open the prompt line, prefilled with the value being changed.
    pub fn start_prompt(&mut self, kind: PromptKind) {
        let needs_table = matches!(
            kind,
            PromptKind::EditCell | PromptKind::RenameColumn | PromptKind::AddColumn
        );
        if needs_table && !self.editor.has_table() {
            self.status_message = "Import a file first".to_string();
            return;
        }
        let no_target = match kind {
            PromptKind::EditCell => self.row_count() == 0 || self.column_count() == 0,
            PromptKind::RenameColumn => self.column_count() == 0,
            _ => false,
        };
        if no_target {
            return;
        }

        self.input_buffer = match kind {
            PromptKind::ImportPath | PromptKind::AddColumn => String::new(),
            PromptKind::EditCell => self
                .editor
                .table()
                .and_then(|t| t.cell(self.cursor_row, self.cursor_col))
                .map(|v| v.to_string())
                .unwrap_or_default(),
            PromptKind::RenameColumn => self.current_column_name().unwrap_or_default(),
            PromptKind::Title => self.editor.title.clone(),
        };
        self.input_cursor = self.input_buffer.len();
        self.prompt = Some(kind);
        self.mode = Mode::Prompt;
        self.status_message.clear();
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.mode = Mode::Normal;
        self.input_buffer.clear();
        self.input_cursor = 0;
    }

    pub fn commit_prompt(&mut self) {
        let Some(kind) = self.prompt else {
            return;
        };
        let input = std::mem::take(&mut self.input_buffer);
        self.cancel_prompt();

        let result = match kind {
            PromptKind::ImportPath => {
                let path = input.trim();
                if !path.is_empty() {
                    self.import_path(Path::new(path));
                }
                Ok(())
            }
            PromptKind::EditCell => match self.current_column_name() {
                Some(name) => self.editor.edit_cell(self.cursor_row, &name, &input),
                None => Ok(()),
            },
            PromptKind::RenameColumn => self.editor.rename_column(self.cursor_col, &input),
            PromptKind::Title => {
                self.editor.title = input.trim().to_string();
                Ok(())
            }
            PromptKind::AddColumn => {
                let name = input.trim();
                if name.is_empty() {
                    Ok(())
                } else {
                    self.editor.append_column(name).map(|()| {
                        self.cursor_col = self.column_count().saturating_sub(1);
                        self.update_viewport();
                    })
                }
            }
        };
        if let Err(e) = result {
            self.status_message = format!("Error: {}", e);
        }
    }

    // ----- Cursor -----

    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        match self.screen {
            Screen::List => {
                let len = self.list.records().len();
                let new = (self.list_cursor as i64 + dy as i64).max(0) as usize;
                self.list_cursor = new.min(len.saturating_sub(1));
            }
            Screen::Editor => {
                let rows = self.row_count();
                let cols = self.column_count();
                let new_row = (self.cursor_row as i64 + dy as i64).max(0) as usize;
                let new_col = (self.cursor_col as i64 + dx as i64).max(0) as usize;
                self.cursor_row = new_row.min(rows.saturating_sub(1));
                self.cursor_col = new_col.min(cols.saturating_sub(1));
                self.update_viewport();
            }
        }
    }

    fn clamp_grid_cursor(&mut self) {
        self.cursor_row = self.cursor_row.min(self.row_count().saturating_sub(1));
        self.cursor_col = self.cursor_col.min(self.column_count().saturating_sub(1));
        self.update_viewport();
    }

    /// Scroll so the cursor stays visible.
    pub fn update_viewport(&mut self) {
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + self.visible_rows {
            self.viewport_row = self.cursor_row + 1 - self.visible_rows.max(1);
        }
        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
        } else if self.cursor_col >= self.viewport_col + self.visible_cols {
            self.viewport_col = self.cursor_col + 1 - self.visible_cols.max(1);
        }
    }
}
