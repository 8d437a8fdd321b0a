use std::collections::BTreeMap;
use std::path::Path;

use crate::value::CellValue;

/// One sheet as read from a backend.
///
/// Coordinates are zero-based `(row, col)`. Only cells the backend reported
/// are present, so rows and columns may be sparse.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub cells: BTreeMap<(u32, u32), CellValue>,
    /// `(rows, cols)` of the used area, counted from the origin.
    pub dimensions: Option<(u32, u32)>,
}

impl SheetData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Dense construction, mostly for tests and in-memory sources.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut sheet = Self::new(name);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                sheet.insert(r as u32, c as u32, cell);
            }
        }
        sheet
    }

    pub fn insert(&mut self, row: u32, col: u32, value: CellValue) {
        self.cover(row, col);
        self.cells.insert((row, col), value);
    }

    /// Widen the used area to include `(row, col)` without storing a value,
    /// for cells the backend saw but that hold nothing.
    pub fn cover(&mut self, row: u32, col: u32) {
        let (rows, cols) = self.dimensions.unwrap_or((0, 0));
        self.dimensions = Some((rows.max(row.saturating_add(1)), cols.max(col.saturating_add(1))));
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Index of the last row holding any cell.
    pub fn last_row(&self) -> Option<u32> {
        self.cells.keys().next_back().map(|(r, _)| *r)
    }

    pub fn row(&self, index: u32) -> SheetRow<'_> {
        let cells = self
            .cells
            .range((index, 0)..=(index, u32::MAX))
            .map(|((_, c), v)| (*c, v))
            .collect();
        SheetRow { index, cells }
    }

    /// Number of rows in the used area, empty trailing rows included.
    pub fn row_count(&self) -> u32 {
        self.dimensions.map_or(0, |(rows, _)| rows)
    }

    /// Every row index after `header` within the used area; gaps and
    /// trailing blank rows come back as empty rows.
    pub fn rows_after(&self, header: u32) -> impl Iterator<Item = SheetRow<'_>> + '_ {
        let start = header.saturating_add(1);
        (start..self.row_count()).map(move |r| self.row(r))
    }
}

/// The cells of one row in ascending column order.
#[derive(Clone, Debug)]
pub struct SheetRow<'a> {
    pub index: u32,
    cells: Vec<(u32, &'a CellValue)>,
}

impl<'a> SheetRow<'a> {
    pub fn cells(&self) -> impl Iterator<Item = (u32, &'a CellValue)> + '_ {
        self.cells.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Container family, chosen from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerFormat {
    /// Zip-based workbook (`.xlsx`, `.xlsm`).
    Xlsx,
    /// Legacy binary workbook; also the fallback for unknown extensions.
    Xls,
    Ods,
    Csv,
}

impl ContainerFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("xlsx") | Some("xlsm") => ContainerFormat::Xlsx,
            Some("ods") => ContainerFormat::Ods,
            Some("csv") => ContainerFormat::Csv,
            _ => ContainerFormat::Xls,
        }
    }
}

pub trait SpreadsheetReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn backend_name(&self) -> &'static str;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    /// `Ok(None)` when the workbook has no sheet by that name.
    fn read_sheet(&mut self, sheet: &str) -> Result<Option<SheetData>, Self::Error>;
}

pub trait SpreadsheetWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn backend_name(&self) -> &'static str;

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error>;

    fn write_cell(&mut self, sheet: &str, row: u32, col: u32, text: &str)
    -> Result<(), Self::Error>;

    /// Persist everything written so far to the target.
    fn save(&mut self) -> Result<(), Self::Error>;

    /// Release the target after a successful save. Failures here do not undo
    /// the write; callers report them and move on.
    fn release(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
