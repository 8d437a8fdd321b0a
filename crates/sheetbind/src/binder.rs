//! Path-level entry points.
//!
//! [`SheetBinder`] owns a target path and a [`SheetConfig`]. It picks a backend
//! from the file extension, then drives the engine: read a sheet and
//! materialize records, or serialize records and write a sheet.

use std::path::{Path, PathBuf};

use crate::config::SheetConfig;
use crate::diagnostics::{Collector, Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{BindError, Result};
use crate::materialize::materialize_sheet;
use crate::schema::SheetRecord;
use crate::serialize::{Grid, serialize};
use crate::traits::{ContainerFormat, SpreadsheetReader, SpreadsheetWriter};

#[cfg(feature = "calamine")]
use crate::backends::CalamineAdapter;
#[cfg(feature = "csv")]
use crate::backends::CsvAdapter;
#[cfg(feature = "umya")]
use crate::backends::UmyaAdapter;

/// Records read from a sheet, plus every per-cell problem met on the way.
#[derive(Debug)]
pub struct ParseOutcome<T> {
    pub records: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> ParseOutcome<T> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub sheet: String,
    /// Data rows, header excluded.
    pub rows_written: usize,
    pub columns: usize,
    /// Problems that did not fail the write, such as a file that could not
    /// be released cleanly after saving.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct SheetBinder {
    path: PathBuf,
    config: SheetConfig,
}

impl SheetBinder {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: SheetConfig::default(),
        }
    }

    pub fn with_config(path: impl AsRef<Path>, config: SheetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn format(&self) -> ContainerFormat {
        ContainerFormat::from_path(&self.path)
    }

    pub fn set_start_row(&mut self, start_row: u32) -> Result<()> {
        self.config.set_start_row(start_row)
    }

    pub fn set_sheet_name(&mut self, name: impl Into<String>) {
        self.config.sheet_name = name.into();
    }

    pub fn set_date_format(&mut self, pattern: impl Into<String>) -> Result<()> {
        self.config.date_format = crate::config::DateFormat::new(pattern)?;
        Ok(())
    }

    /// Read the configured sheet into records.
    ///
    /// Per-cell problems are traced and returned alongside the records; only
    /// container-level failures produce an `Err`.
    pub fn parse<T: SheetRecord>(&self) -> Result<ParseOutcome<T>> {
        let mut collector = Collector::default();
        let records = self.parse_with(&mut collector)?;
        Ok(ParseOutcome {
            records,
            diagnostics: collector.diagnostics,
        })
    }

    /// Like [`parse`](Self::parse), handing diagnostics to `sink` instead.
    pub fn parse_with<T, S>(&self, sink: &mut S) -> Result<Vec<T>>
    where
        T: SheetRecord,
        S: DiagnosticSink + ?Sized,
    {
        let _span = tracing::info_span!(
            "sheetbind_parse",
            path = %self.path.display(),
            sheet = self.config.sheet_name.as_str()
        )
        .entered();
        self.config.validate()?;

        match self.format() {
            #[cfg(feature = "calamine")]
            ContainerFormat::Xlsx | ContainerFormat::Xls | ContainerFormat::Ods => {
                let mut reader = CalamineAdapter::open_path(&self.path).map_err(|e| {
                    tracing::error!(error = %e, "cannot open workbook");
                    BindError::container(&self.path, e)
                })?;
                self.read_from(&mut reader, sink)
            }
            #[cfg(feature = "csv")]
            ContainerFormat::Csv => {
                let reader = CsvAdapter::open_path(&self.path).map_err(|e| {
                    tracing::error!(error = %e, "cannot open csv");
                    BindError::container(&self.path, e)
                })?;
                self.read_from(&mut reader.named(self.config.sheet_name.as_str()), sink)
            }
            #[allow(unreachable_patterns)]
            _ => Err(self.unsupported()),
        }
    }

    /// Materialize the configured sheet from an already opened reader.
    ///
    /// A sheet that does not exist yields no records.
    pub fn read_from<R, T, S>(&self, reader: &mut R, sink: &mut S) -> Result<Vec<T>>
    where
        R: SpreadsheetReader,
        T: SheetRecord,
        S: DiagnosticSink + ?Sized,
    {
        let backend = reader.backend_name();
        let sheet = reader
            .read_sheet(&self.config.sheet_name)
            .map_err(|e| BindError::from_backend(backend, e))?;
        let Some(sheet) = sheet else {
            tracing::warn!(
                backend,
                sheet = self.config.sheet_name.as_str(),
                "sheet not found"
            );
            return Ok(Vec::new());
        };
        let records: Vec<T> = materialize_sheet(&sheet, &self.config, sink);
        tracing::debug!(backend, records = records.len(), "sheet materialized");
        Ok(records)
    }

    /// Write `records` to the binder's path: one header row of display names,
    /// then one row per record.
    ///
    /// Fails with [`BindError::NothingToWrite`] when `records` is empty; the
    /// target is not created in that case.
    pub fn create_excel<T: SheetRecord>(&self, records: &[T]) -> Result<WriteSummary> {
        let _span = tracing::info_span!(
            "sheetbind_write",
            path = %self.path.display(),
            sheet = self.config.sheet_name.as_str()
        )
        .entered();
        self.config.validate()?;
        let grid = serialize(&T::schema(), records)?;

        match self.format() {
            #[cfg(feature = "umya")]
            ContainerFormat::Xlsx => self.write_grid(&mut UmyaAdapter::create(&self.path), &grid),
            #[cfg(feature = "csv")]
            ContainerFormat::Csv => self.write_grid(&mut CsvAdapter::create(&self.path), &grid),
            #[allow(unreachable_patterns)]
            _ => Err(self.unsupported()),
        }
    }

    /// Serialize `records` into an already constructed writer.
    pub fn write_to<W, T>(&self, writer: &mut W, records: &[T]) -> Result<WriteSummary>
    where
        W: SpreadsheetWriter,
        T: SheetRecord,
    {
        let grid = serialize(&T::schema(), records)?;
        self.write_grid(writer, &grid)
    }

    fn write_grid<W: SpreadsheetWriter>(&self, writer: &mut W, grid: &Grid) -> Result<WriteSummary> {
        let backend = writer.backend_name();
        let sheet = self.config.sheet_name.as_str();

        writer
            .create_sheet(sheet)
            .map_err(|e| BindError::from_backend(backend, e))?;
        for (row, col, text) in grid.cells() {
            writer
                .write_cell(sheet, row, col, text)
                .map_err(|e| BindError::Write {
                    row,
                    col,
                    message: e.to_string(),
                })?;
        }
        writer.save().map_err(|e| {
            tracing::error!(backend, error = %e, "save failed");
            BindError::from_backend(backend, e)
        })?;

        let mut diagnostics = Vec::new();
        if let Err(e) = writer.release() {
            let diagnostic = Diagnostic::release(format!("{backend}: {e}"));
            TracingSink.report(diagnostic.clone());
            diagnostics.push(diagnostic);
        }

        tracing::info!(backend, rows = grid.rows.len(), "sheet written");
        Ok(WriteSummary {
            path: self.path.clone(),
            sheet: sheet.to_string(),
            rows_written: grid.rows.len(),
            columns: grid.column_count(),
            diagnostics,
        })
    }

    fn unsupported(&self) -> BindError {
        tracing::error!(format = ?self.format(), "no backend for container format");
        BindError::UnsupportedFormat {
            path: self.path.clone(),
        }
    }
}
