use crate::config::DEFAULT_SHEET_NAME;
use crate::error::BindError;
use crate::traits::{SheetData, SpreadsheetReader, SpreadsheetWriter};
use crate::value::CellValue;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvTrim {
    #[default]
    None,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvTypeInference {
    /// Do not infer: treat all non-empty fields as text.
    #[default]
    Off,
    /// Infer booleans + numbers when unambiguous.
    Basic,
}

#[derive(Clone, Debug)]
pub struct CsvReadOptions {
    /// Field delimiter as a single byte. Use `b'\t'` for TSV.
    pub delimiter: u8,
    pub trim: CsvTrim,
    pub type_inference: CsvTypeInference,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: CsvTrim::None,
            type_inference: CsvTypeInference::Off,
        }
    }
}

/// CSV backend adapter.
///
/// Semantics:
/// - A CSV file is treated as a single-sheet workbook (default sheet name: `Sheet1`).
/// - UTF-8 only; every record, including the first, is loaded as data.
/// - Writing keeps the grid in memory and emits it on save.
pub struct CsvAdapter {
    sheet_name: String,
    cells: BTreeMap<(u32, u32), CellValue>,
    /// `(rows, cols)` seen on read or written, blank fields included.
    extent: Option<(u32, u32)>,
    path: Option<PathBuf>,
    read_options: CsvReadOptions,
    file: Option<File>,
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvAdapter {
    pub fn new() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            cells: BTreeMap::new(),
            extent: None,
            path: None,
            read_options: CsvReadOptions::default(),
            file: None,
        }
    }

    /// Name the file's only sheet. Reads of any other name find nothing.
    pub fn named(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = sheet_name.into();
        self
    }

    /// Target for [`SpreadsheetWriter::save`].
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        let mut adapter = Self::new();
        adapter.path = Some(path.as_ref().to_path_buf());
        adapter
    }

    pub fn read_options(&self) -> &CsvReadOptions {
        &self.read_options
    }

    pub fn open_path_with_options<P: AsRef<Path>>(
        path: P,
        read_options: CsvReadOptions,
    ) -> Result<Self, BindError> {
        let file = File::open(path.as_ref())?;
        let mut adapter = Self::open_reader_with_options(BufReader::new(file), read_options)?;
        adapter.path = Some(path.as_ref().to_path_buf());
        Ok(adapter)
    }

    pub fn open_reader_with_options<R: Read>(
        reader: R,
        read_options: CsvReadOptions,
    ) -> Result<Self, BindError> {
        let mut rb = ::csv::ReaderBuilder::new();
        rb.delimiter(read_options.delimiter)
            .has_headers(false)
            // Allow ragged rows; short rows simply have fewer cells.
            .flexible(true);

        match read_options.trim {
            CsvTrim::None => rb.trim(::csv::Trim::None),
            CsvTrim::All => rb.trim(::csv::Trim::All),
        };

        let mut rdr = rb.from_reader(reader);
        let mut adapter = Self {
            read_options,
            ..Self::new()
        };
        for (row, rec) in rdr.records().enumerate() {
            let rec = rec.map_err(|e| BindError::from_backend("csv", e))?;
            let row = row as u32;
            adapter.grow(row, rec.len().saturating_sub(1) as u32);
            for (col, field) in rec.iter().enumerate() {
                if let Some(v) = infer_field(field, adapter.read_options.type_inference) {
                    adapter.cells.insert((row, col as u32), v);
                }
            }
        }
        Ok(adapter)
    }

    fn grow(&mut self, row: u32, col: u32) {
        let (rows, cols) = self.extent.unwrap_or((0, 0));
        self.extent = Some((rows.max(row.saturating_add(1)), cols.max(col.saturating_add(1))));
    }

    fn write_grid(&self, file: &mut File) -> Result<(), BindError> {
        let Some((rows, cols)) = self.extent else {
            return Ok(());
        };

        let mut wtr = ::csv::WriterBuilder::new().from_writer(file);
        for r in 0..rows {
            let record: Vec<String> = (0..cols)
                .map(|c| self.cells.get(&(r, c)).map(CellValue::raw_text).unwrap_or_default())
                .collect();
            wtr.write_record(&record)
                .map_err(|e| BindError::from_backend("csv", e))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl SpreadsheetReader for CsvAdapter {
    type Error = BindError;

    fn backend_name(&self) -> &'static str {
        "csv"
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Self::open_path_with_options(path, CsvReadOptions::default())
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(vec![self.sheet_name.clone()])
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<Option<SheetData>, Self::Error> {
        if sheet != self.sheet_name {
            return Ok(None);
        }
        let mut data = SheetData::new(sheet);
        if let Some((rows, cols)) = self.extent {
            data.cover(rows - 1, cols - 1);
        }
        for ((r, c), v) in &self.cells {
            data.insert(*r, *c, v.clone());
        }
        Ok(Some(data))
    }
}

impl SpreadsheetWriter for CsvAdapter {
    type Error = BindError;

    fn backend_name(&self) -> &'static str {
        "csv"
    }

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error> {
        // A CSV file holds exactly one sheet; the first name given wins.
        if self.extent.is_none() {
            self.sheet_name = name.to_string();
            return Ok(());
        }
        if name == self.sheet_name {
            return Ok(());
        }
        Err(BindError::from_backend("csv", "multiple sheets are not supported"))
    }

    fn write_cell(&mut self, sheet: &str, row: u32, col: u32, text: &str) -> Result<(), Self::Error> {
        if sheet != self.sheet_name {
            return Err(BindError::from_backend("csv", format!("sheet not found: {sheet}")));
        }
        self.grow(row, col);
        if text.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), CellValue::text(text));
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), Self::Error> {
        let Some(path) = self.path.as_ref() else {
            return Err(BindError::from_backend("csv", "no known path for save"));
        };
        let mut file = File::create(path)?;
        self.write_grid(&mut file)?;
        self.file = Some(file);
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        match self.file.take() {
            Some(file) => Ok(file.sync_all()?),
            None => Ok(()),
        }
    }
}

fn infer_field(field: &str, mode: CsvTypeInference) -> Option<CellValue> {
    if field.is_empty() {
        return None;
    }
    if mode == CsvTypeInference::Off {
        return Some(CellValue::text(field));
    }

    if let Some(b) = parse_bool(field) {
        return Some(CellValue::Boolean(b));
    }
    if let Some(n) = parse_unambiguous_number(field) {
        return Some(CellValue::number(n));
    }
    Some(CellValue::text(field))
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_unambiguous_number(s: &str) -> Option<f64> {
    // Conservative: reject leading zeros ("007" stays text) and non-finite spellings.
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    let int_part = digits.split(['.', 'e', 'E']).next().unwrap_or("");
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if int_part.len() > 1 && int_part.starts_with('0') {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}
