#![cfg(feature = "umya")]

use crate::traits::SpreadsheetWriter;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Spreadsheet, XlsxError};

/// Builds a new `.xlsx` workbook in memory and writes it to `path` on save.
pub struct UmyaAdapter {
    workbook: RwLock<Spreadsheet>,
    path: PathBuf,
}

impl UmyaAdapter {
    /// Start an empty workbook (no sheets) targeting `path`. Nothing touches
    /// the filesystem until [`SpreadsheetWriter::save`].
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        Self {
            workbook: RwLock::new(umya_spreadsheet::new_file_empty_worksheet()),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        let wb = self.workbook.read();
        wb.get_sheet_collection_no_check()
            .iter()
            .map(|ws| ws.get_name().to_string())
            .collect()
    }
}

impl SpreadsheetWriter for UmyaAdapter {
    type Error = XlsxError;

    fn backend_name(&self) -> &'static str {
        "umya"
    }

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        if wb.get_sheet_by_name(name).is_none() {
            wb.new_sheet(name)
                .map_err(|e| XlsxError::CellError(e.to_string()))?;
        }
        Ok(())
    }

    fn write_cell(&mut self, sheet: &str, row: u32, col: u32, text: &str) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        let ws = wb
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| XlsxError::CellError(format!("sheet not found: {sheet}")))?;
        // umya uses 1-based (col, row)
        ws.get_cell_mut((col + 1, row + 1)).set_value_string(text);
        Ok(())
    }

    fn save(&mut self) -> Result<(), Self::Error> {
        let wb = self.workbook.read();
        umya_spreadsheet::writer::xlsx::write(&*wb, &self.path)
    }
}
