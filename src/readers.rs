//! The routines under comparison. Each one is a stateless capability that
//! reads a single worksheet into the same in-memory table shape, so the
//! harness times comparable work across libraries.

use crate::errors::{SheetBenchError, SheetBenchResult};
use std::path::Path;

/// A cell in the common in-memory table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

/// The table every routine must materialize: a header row plus data rows.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }
}

/// One spreadsheet-import routine. Implementations hold no mutable state;
/// every call opens the workbook from scratch so no caching leaks between
/// observations.
pub trait SheetReader {
    fn name(&self) -> &'static str;
    fn read_sheet(&self, path: &Path, sheet: &str) -> SheetBenchResult<SheetTable>;
}

fn read_error(
    routine: &str,
    path: &Path,
    sheet: &str,
    message: impl std::fmt::Display,
) -> SheetBenchError {
    SheetBenchError::ReadError {
        routine: routine.to_string(),
        fixture: path.display().to_string(),
        sheet: sheet.to_string(),
        message: message.to_string(),
    }
}

/// calamine: eager `worksheet_range` read.
pub struct CalamineReader;

impl SheetReader for CalamineReader {
    fn name(&self) -> &'static str {
        "calamine"
    }

    fn read_sheet(&self, path: &Path, sheet: &str) -> SheetBenchResult<SheetTable> {
        use calamine::{open_workbook, Data, Reader, Xlsx};

        let mut workbook: Xlsx<_> =
            open_workbook(path).map_err(|e| read_error(self.name(), path, sheet, e))?;
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| read_error(self.name(), path, sheet, e))?;

        let mut table = SheetTable::default();
        let mut rows = range.rows();
        if let Some(header) = rows.next() {
            table.headers = header
                .iter()
                .map(|c| match c {
                    Data::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
        }
        for row in rows {
            let cells = row
                .iter()
                .map(|c| match c {
                    Data::Empty => CellValue::Empty,
                    Data::Float(f) => CellValue::Number(*f),
                    Data::Int(i) => CellValue::Number(*i as f64),
                    Data::Bool(b) => CellValue::Bool(*b),
                    Data::String(s) => CellValue::Text(s.clone()),
                    other => CellValue::Text(other.to_string()),
                })
                .collect();
            table.rows.push(cells);
        }
        Ok(table)
    }
}

/// umya-spreadsheet: full document-model read.
pub struct UmyaReader;

impl SheetReader for UmyaReader {
    fn name(&self) -> &'static str {
        "umya"
    }

    fn read_sheet(&self, path: &Path, sheet: &str) -> SheetBenchResult<SheetTable> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| read_error(self.name(), path, sheet, format!("{:?}", e)))?;
        let worksheet = book
            .get_sheet_by_name(sheet)
            .ok_or_else(|| read_error(self.name(), path, sheet, "no such sheet"))?;

        let n_cols = worksheet.get_highest_column();
        let n_rows = worksheet.get_highest_row();

        let mut table = SheetTable::default();
        if n_rows == 0 || n_cols == 0 {
            return Ok(table);
        }

        for col in 1..=n_cols {
            table.headers.push(worksheet.get_value((col, 1)));
        }
        for row in 2..=n_rows {
            let mut cells = Vec::with_capacity(n_cols as usize);
            for col in 1..=n_cols {
                let raw = worksheet.get_value((col, row));
                cells.push(if raw.is_empty() {
                    CellValue::Empty
                } else if let Ok(f) = raw.parse::<f64>() {
                    CellValue::Number(f)
                } else {
                    CellValue::Text(raw)
                });
            }
            table.rows.push(cells);
        }
        Ok(table)
    }
}

/// office: tafia's pre-calamine reader.
pub struct OfficeReader;

impl SheetReader for OfficeReader {
    fn name(&self) -> &'static str {
        "office"
    }

    fn read_sheet(&self, path: &Path, sheet: &str) -> SheetBenchResult<SheetTable> {
        use office::{DataType, Excel};

        let mut workbook =
            Excel::open(path).map_err(|e| read_error(self.name(), path, sheet, e))?;
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| read_error(self.name(), path, sheet, e))?;

        let mut table = SheetTable::default();
        let mut rows = range.rows();
        if let Some(header) = rows.next() {
            table.headers = header
                .iter()
                .map(|c| match c {
                    DataType::String(s) => s.clone(),
                    other => format!("{:?}", other),
                })
                .collect();
        }
        for row in rows {
            let cells = row
                .iter()
                .map(|c| match c {
                    DataType::Empty => CellValue::Empty,
                    DataType::Float(f) => CellValue::Number(*f),
                    DataType::Int(i) => CellValue::Number(*i as f64),
                    DataType::Bool(b) => CellValue::Bool(*b),
                    DataType::String(s) => CellValue::Text(s.clone()),
                    DataType::Error(e) => CellValue::Text(format!("{:?}", e)),
                })
                .collect();
            table.rows.push(cells);
        }
        Ok(table)
    }
}

/// The full routine set of the canonical run, in measurement order.
pub fn default_routines() -> Vec<Box<dyn SheetReader>> {
    vec![
        Box::new(CalamineReader),
        Box::new(UmyaReader),
        Box::new(OfficeReader),
    ]
}

pub fn routine_by_name(name: &str) -> Option<Box<dyn SheetReader>> {
    match name {
        "calamine" => Some(Box::new(CalamineReader)),
        "umya" => Some(Box::new(UmyaReader)),
        "office" => Some(Box::new(OfficeReader)),
        _ => None,
    }
}
