#![cfg(feature = "calamine")]

use crate::traits::{SheetData, SpreadsheetReader};
use crate::value::{CellValue, ErrorCode};
use parking_lot::RwLock;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ::calamine::{CellErrorType, Data, Range, Reader, Sheets, open_workbook_auto};

/// Reads `.xlsx`, `.xlsm`, `.xls` and `.ods` containers.
pub struct CalamineAdapter {
    workbook: RwLock<Sheets<BufReader<File>>>,
}

impl CalamineAdapter {
    fn convert_error(e: &CellErrorType) -> ErrorCode {
        #[allow(unreachable_patterns)]
        match e {
            CellErrorType::Div0 => ErrorCode::Div0,
            CellErrorType::NA => ErrorCode::Na,
            CellErrorType::Name => ErrorCode::Name,
            CellErrorType::Null => ErrorCode::Null,
            CellErrorType::Num => ErrorCode::Num,
            CellErrorType::Ref => ErrorCode::Ref,
            CellErrorType::Value => ErrorCode::Value,
            CellErrorType::GettingData => ErrorCode::GettingData,
            _ => ErrorCode::Value,
        }
    }

    fn convert_value(data: &Data) -> Option<CellValue> {
        #[allow(unreachable_patterns)]
        let value = match data {
            Data::Empty => return None,
            // Treat empty strings as no value
            Data::String(s) if s.is_empty() => return None,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::number(*f),
            Data::Int(i) => CellValue::number(*i as f64),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::Error(e) => CellValue::Error(Self::convert_error(e)),
            // Durations keep their raw day count and read as plain numbers.
            Data::DateTime(dt) => CellValue::Numeric {
                value: dt.as_f64(),
                date_formatted: dt.is_datetime(),
            },
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        };
        Some(value)
    }

    fn range_to_sheet(name: &str, range: &Range<Data>, formulas: Option<&Range<String>>) -> SheetData {
        let mut sheet = SheetData::new(name);
        // Rows of empty strings still count toward the used area.
        if let Some((end_row, end_col)) = range.end() {
            sheet.cover(end_row, end_col);
        }

        // used_cells() positions are relative to the range origin.
        let (start_row, start_col) = range.start().unwrap_or_default();
        for (row, col, val) in range.used_cells() {
            if let Some(value) = Self::convert_value(val) {
                sheet.insert(start_row + row as u32, start_col + col as u32, value);
            }
        }

        // A formula cell reports its source, not its cached result.
        if let Some(frm_range) = formulas {
            let (start_row, start_col) = frm_range.start().unwrap_or_default();
            for (row, col, formula) in frm_range.used_cells() {
                if formula.is_empty() {
                    continue;
                }
                sheet.insert(
                    start_row + row as u32,
                    start_col + col as u32,
                    CellValue::formula(formula.as_str()),
                );
            }
        }

        sheet
    }
}

impl SpreadsheetReader for CalamineAdapter {
    type Error = ::calamine::Error;

    fn backend_name(&self) -> &'static str {
        "calamine"
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let workbook = open_workbook_auto(path)?;
        Ok(Self {
            workbook: RwLock::new(workbook),
        })
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.workbook.read().sheet_names().to_vec())
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<Option<SheetData>, Self::Error> {
        let mut wb = self.workbook.write();
        if !wb.sheet_names().iter().any(|n| n == sheet) {
            return Ok(None);
        }
        let range = wb.worksheet_range(sheet)?;
        // Formulas (may be empty strings); a workbook without formula parts is fine.
        let formulas = wb.worksheet_formula(sheet).ok();

        let data = Self::range_to_sheet(sheet, &range, formulas.as_ref());
        tracing::debug!(
            backend = "calamine",
            sheet,
            cells = data.cells.len(),
            "sheet loaded"
        );
        Ok(Some(data))
    }
}
