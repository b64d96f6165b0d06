//! In-memory table for the first worksheet of a spreadsheet.
//!
//! - [`CellValue`] - The typed content of one cell
//! - [`Table`] - Ordered column names plus rows aligned to them
//!
//! Rows are fixed-arity: `rows[r][c]` is the value of `column_names[c]`.
//! Lookups by name resolve to the *last* column carrying that name, which is
//! how a keyed row behaves once a rename produces a duplicate name.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Result, SheetdeskError};

/// The content of a single cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    /// The source row had no value for this column.
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// ISO-8601 date or date-time string.
    Date(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> CellValue {
        CellValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) | CellValue::Date(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// A table of rows sharing one ordered set of column names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    column_names: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table from keyed rows, the way a "sheet to objects" conversion
    /// hands them over.
    ///
    /// Column names are the keys of the first row, in order. Every row is then
    /// rebuilt against those names: keys the first row lacks are dropped and
    /// missing keys become [`CellValue::Empty`].
    pub fn from_keyed_rows(rows: Vec<Vec<(String, CellValue)>>) -> Result<Table> {
        let Some(first) = rows.first() else {
            return Err(SheetdeskError::EmptySheet);
        };
        let column_names: Vec<String> = first.iter().map(|(k, _)| k.clone()).collect();

        let rows = rows
            .into_iter()
            .map(|row| {
                column_names
                    .iter()
                    .map(|name| {
                        row.iter()
                            .rev()
                            .find(|(k, _)| k == name)
                            .map(|(_, v)| v.clone())
                            .unwrap_or(CellValue::Empty)
                    })
                    .collect()
            })
            .collect();

        Ok(Table { column_names, rows })
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// True when every row has exactly one value per column.
    pub fn is_consistent(&self) -> bool {
        self.rows.iter().all(|r| r.len() == self.column_names.len())
    }

    /// Index of the column that answers lookups for `name`.
    fn column_for(&self, name: &str) -> Option<usize> {
        self.column_names.iter().rposition(|n| n == name)
    }

    /// Value at `(row, col)` by position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Value of column `name` in `row`.
    pub fn value(&self, row: usize, name: &str) -> Option<&CellValue> {
        let col = self.column_for(name)?;
        self.cell(row, col)
    }

    /// Rename the column at `index`, remapping row values by position.
    ///
    /// If the new name duplicates another column, the later of the two
    /// positions wins for that name and both positions show its value.
    pub fn rename_column(&mut self, index: usize, new_name: &str) -> Result<()> {
        if index >= self.column_names.len() {
            return Err(SheetdeskError::ColumnOutOfRange {
                index,
                len: self.column_names.len(),
            });
        }
        self.column_names[index] = new_name.to_string();
        self.rebuild_by_name();
        Ok(())
    }

    /// Re-key every row against the current names so duplicate names resolve
    /// to the same (last) value.
    fn rebuild_by_name(&mut self) {
        let sources: Vec<usize> = self
            .column_names
            .iter()
            .enumerate()
            .map(|(i, name)| self.column_for(name).unwrap_or(i))
            .collect();
        for row in &mut self.rows {
            let old = row.clone();
            for (i, src) in sources.iter().enumerate() {
                row[i] = old[*src].clone();
            }
        }
    }

    /// Set the value of column `name` in `row`.
    ///
    /// Every column carrying that name is written so the row stays keyed.
    pub fn set_value(&mut self, row: usize, name: &str, value: CellValue) -> Result<()> {
        let len = self.rows.len();
        if self.column_for(name).is_none() {
            return Err(SheetdeskError::UnknownColumn(name.to_string()));
        }
        let Some(cells) = self.rows.get_mut(row) else {
            return Err(SheetdeskError::RowOutOfRange { index: row, len });
        };
        for (i, col_name) in self.column_names.iter().enumerate() {
            if col_name == name {
                cells[i] = value.clone();
            }
        }
        Ok(())
    }

    /// Remove every row whose index is in `indices`. Returns how many were removed.
    pub fn remove_rows(&mut self, indices: &BTreeSet<usize>) -> usize {
        let before = self.rows.len();
        let mut idx = 0;
        self.rows.retain(|_| {
            let keep = !indices.contains(&idx);
            idx += 1;
            keep
        });
        before - self.rows.len()
    }

    /// Remove every column whose index is in `indices`, rebuilding rows by
    /// surviving name. Returns how many columns were removed.
    pub fn remove_columns(&mut self, indices: &BTreeSet<usize>) -> usize {
        if indices.is_empty() {
            return 0;
        }
        let surviving: Vec<String> = self
            .column_names
            .iter()
            .enumerate()
            .filter(|(i, _)| !indices.contains(i))
            .map(|(_, n)| n.clone())
            .collect();
        let sources: Vec<usize> = surviving
            .iter()
            .filter_map(|name| self.column_for(name))
            .collect();

        for row in &mut self.rows {
            *row = sources.iter().map(|&src| row[src].clone()).collect();
        }
        let removed = self.column_names.len() - surviving.len();
        self.column_names = surviving;
        removed
    }

    /// Append a row of empty cells.
    pub fn push_row(&mut self) {
        self.rows.push(vec![CellValue::Empty; self.column_names.len()]);
    }

    /// Append a column; every existing row gets an empty cell for it.
    ///
    /// The new column would take over lookups for an existing name, so
    /// duplicate names are rejected.
    pub fn push_column(&mut self, name: &str) -> Result<()> {
        if self.column_for(name).is_some() {
            return Err(SheetdeskError::DuplicateColumn(name.to_string()));
        }
        self.column_names.push(name.to_string());
        for row in &mut self.rows {
            row.push(CellValue::Empty);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn keyed(pairs: &[(&str, CellValue)]) -> Vec<(String, CellValue)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_table() -> Table {
    Table::from_keyed_rows(vec![
        keyed(&[("A", 1.0.into()), ("B", 2.0.into())]),
        keyed(&[("A", 3.0.into()), ("B", 4.0.into())]),
    ])
    .unwrap()
}
