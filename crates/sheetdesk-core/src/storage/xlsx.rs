//! Excel import (xlsx, xls, xlsb, ods) and export (xlsx only).
//!
//! Import reads the first worksheet only. The first row of the used range is
//! the header; every following non-blank row becomes a keyed row. Export writes
//! a single `Sheet1` with the column names as header row.

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use chrono::Timelike;
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use crate::error::{Result, SheetdeskError};
use crate::table::{CellValue, Table};

/// Name given to the single worksheet written on export.
pub const EXPORT_SHEET_NAME: &str = "Sheet1";

/// MIME type of the encoded workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Header used for a blank header cell.
const BLANK_HEADER: &str = "__EMPTY";

/// Parse a spreadsheet file into a table.
pub fn read_xlsx(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path)?;
    parse_xlsx(bytes)
}

/// Parse spreadsheet bytes into a table.
pub fn parse_xlsx(bytes: Vec<u8>) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(SheetdeskError::NoWorksheets);
    };
    let range = workbook.worksheet_range(&sheet_name)?;
    log::debug!(
        "reading sheet '{}' ({}x{})",
        sheet_name,
        range.height(),
        range.width()
    );

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(SheetdeskError::EmptySheet);
    };
    let headers = header_names(header_row);

    let keyed: Vec<Vec<(String, CellValue)>> = rows
        .filter_map(|row| {
            let pairs: Vec<(String, CellValue)> = headers
                .iter()
                .zip(row.iter())
                .filter_map(|(name, cell)| cell_value(cell).map(|v| (name.clone(), v)))
                .collect();
            if pairs.is_empty() { None } else { Some(pairs) }
        })
        .collect();

    Table::from_keyed_rows(keyed)
}

/// Derive unique header names: blank cells become `__EMPTY`, repeats get a
/// `_1`, `_2`, ... suffix.
fn header_names(row: &[Data]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    row.iter()
        .map(|cell| {
            let base = cell_value(cell)
                .map(|v| v.to_string())
                .unwrap_or_else(|| BLANK_HEADER.to_string());
            let mut name = base.clone();
            let mut n = 1;
            while seen.contains(&name) {
                name = format!("{}_{}", base, n);
                n += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

/// Convert a calamine cell. `None` means the cell is absent from the row.
fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(match cell.as_datetime() {
            Some(ndt) if ndt.num_seconds_from_midnight() == 0 => {
                CellValue::Date(ndt.format("%Y-%m-%d").to_string())
            }
            Some(ndt) => CellValue::Date(ndt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Number(dt.as_f64()),
        }),
        Data::DateTimeIso(s) => Some(CellValue::Date(s.clone())),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
    }
}

/// Encode a table as an xlsx workbook in memory.
pub fn write_xlsx_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table)?;
    Ok(workbook.save_to_buffer()?)
}

/// Encode a table and write it to `path`.
pub fn write_xlsx(path: &Path, table: &Table) -> Result<()> {
    let mut workbook = build_workbook(table)?;
    workbook.save(path)?;
    Ok(())
}

fn build_workbook(table: &Table) -> Result<Workbook> {
    // One extra row for the header.
    if table.row_count() >= MAX_ROWS || table.column_count() > MAX_COLS {
        return Err(SheetdeskError::TooLarge {
            rows: table.row_count(),
            cols: table.column_count(),
        });
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, name) in table.column_names().iter().enumerate() {
        worksheet.write_string(0, col as u16, name.as_str())?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let xl_row = (r + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            let xl_col = col as u16;
            match value {
                CellValue::Empty => {}
                CellValue::Text(s) | CellValue::Date(s) => {
                    worksheet.write_string(xl_row, xl_col, s.as_str())?;
                }
                CellValue::Number(n) if n.is_finite() => {
                    worksheet.write_number(xl_row, xl_col, *n)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_string(xl_row, xl_col, n.to_string())?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(xl_row, xl_col, *b)?;
                }
            }
        }
    }

    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{keyed, sample_table};
    use rust_xlsxwriter::Format;

    fn write_raw(rows: &[&[Option<&str>]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(s) = cell {
                    worksheet.write_string(r as u32, c as u16, *s).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_round_trip_preserves_names_and_values() {
        let table = sample_table();
        let bytes = write_xlsx_bytes(&table).unwrap();
        let back = parse_xlsx(bytes).unwrap();
        assert_eq!(back.column_names(), table.column_names());
        for (orig, read) in table.rows().iter().zip(back.rows()) {
            let a: Vec<String> = orig.iter().map(|v| v.to_string()).collect();
            let b: Vec<String> = read.iter().map(|v| v.to_string()).collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_round_trip_text_and_bool() {
        let table = Table::from_keyed_rows(vec![keyed(&[
            ("Name", "Ada".into()),
            ("Active", true.into()),
            ("Joined", CellValue::Date("2024-01-31".into())),
        ])])
        .unwrap();
        let back = parse_xlsx(write_xlsx_bytes(&table).unwrap()).unwrap();
        assert_eq!(back.value(0, "Name"), Some(&CellValue::text("Ada")));
        assert_eq!(back.value(0, "Active"), Some(&CellValue::Bool(true)));
        assert_eq!(back.value(0, "Joined").map(|v| v.to_string()), Some("2024-01-31".to_string()));
    }

    #[test]
    fn test_date_cells_read_as_iso_strings() {
        // 45322 is the Excel serial for 2024-01-31.
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_only = Format::new().set_num_format("yyyy-mm-dd");
        let date_time = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        worksheet.write_string(0, 0, "Due").unwrap();
        worksheet.write_string(0, 1, "Sent").unwrap();
        worksheet
            .write_number_with_format(1, 0, 45322.0, &date_only)
            .unwrap();
        worksheet
            .write_number_with_format(1, 1, 45322.5, &date_time)
            .unwrap();

        let table = parse_xlsx(workbook.save_to_buffer().unwrap()).unwrap();
        assert_eq!(
            table.value(0, "Due"),
            Some(&CellValue::Date("2024-01-31".to_string()))
        );
        assert_eq!(
            table.value(0, "Sent"),
            Some(&CellValue::Date("2024-01-31T12:00:00".to_string()))
        );
    }

    #[test]
    fn test_header_only_sheet_is_empty_error() {
        let bytes = write_raw(&[&[Some("A"), Some("B")]]);
        let err = parse_xlsx(bytes).unwrap_err();
        assert!(matches!(err, SheetdeskError::EmptySheet));
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let bytes = write_raw(&[
            &[Some("A"), None, Some("A"), Some("B")],
            &[Some("1"), Some("2"), Some("3"), Some("4")],
        ]);
        let table = parse_xlsx(bytes).unwrap();
        assert_eq!(table.column_names(), &["A", "__EMPTY", "A_1", "B"]);
    }

    #[test]
    fn test_blank_rows_skipped_and_columns_from_first_data_row() {
        let bytes = write_raw(&[
            &[Some("A"), Some("B")],
            &[Some("x"), None],
            &[None, None],
            &[Some("y"), Some("z")],
        ]);
        let table = parse_xlsx(bytes).unwrap();
        assert_eq!(table.column_names(), &["A"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(1, "A"), Some(&CellValue::text("y")));
    }

    #[test]
    fn test_write_to_file() {
        let output_path = std::env::temp_dir().join(format!(
            "sheetdesk_xlsx_write_{}_{}_{:?}.xlsx",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            std::thread::current().id(),
        ));

        struct Cleanup(std::path::PathBuf);
        impl Drop for Cleanup {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.0);
            }
        }
        let _cleanup = Cleanup(output_path.clone());

        write_xlsx(&output_path, &sample_table()).unwrap();
        let table = read_xlsx(&output_path).unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_garbage_bytes_fail_to_parse() {
        let err = parse_xlsx(b"not a workbook".to_vec()).unwrap_err();
        assert!(matches!(err, SheetdeskError::SheetRead(_)));
    }
}
