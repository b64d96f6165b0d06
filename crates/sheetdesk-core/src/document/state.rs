use std::collections::BTreeSet;

use crate::table::Table;

/// Rows and columns staged for deletion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub rows: BTreeSet<usize>,
    pub columns: BTreeSet<usize>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns.clear();
    }
}

/// UI-agnostic state of one editing session.
///
/// The editor starts empty. Importing a file replaces everything; navigating
/// away from the editor is expected to drop the session.
#[derive(Debug, Default)]
pub struct Editor {
    /// The imported table, `None` until a file is imported
    pub(crate) table: Option<Table>,
    /// Title used as the exported/uploaded file name (without extension)
    pub title: String,
    /// Rows/columns staged for deletion
    pub(crate) selection: Selection,
    /// Whether the table changed since import
    pub modified: bool,
}

impl Editor {
    /// Create an empty editor session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// Drop all session state.
    pub fn reset(&mut self) {
        *self = Editor::new();
    }
}
