//! Bind spreadsheet rows to typed records, and write records back as sheets.
//!
//! ```no_run
//! use sheetbind::{SheetBinder, SheetRecord};
//!
//! #[derive(Debug, Default, SheetRecord)]
//! struct Employee {
//!     #[sheet(name = "Name", order = 1)]
//!     name: String,
//!     #[sheet(name = "Age", order = 2)]
//!     age: i32,
//! }
//!
//! let binder = SheetBinder::new("staff.xlsx");
//! let outcome = binder.parse::<Employee>()?;
//! for d in &outcome.diagnostics {
//!     eprintln!("{d}");
//! }
//! # Ok::<(), sheetbind::BindError>(())
//! ```

extern crate self as sheetbind;

pub mod backends;
pub mod binder;
pub mod coerce;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod header;
pub mod materialize;
pub mod schema;
pub mod serialize;
pub mod traits;
pub mod value;

#[cfg(feature = "calamine")]
pub use backends::CalamineAdapter;
#[cfg(feature = "umya")]
pub use backends::UmyaAdapter;
#[cfg(feature = "csv")]
pub use backends::{CsvAdapter, CsvReadOptions, CsvTrim, CsvTypeInference};
pub use binder::{ParseOutcome, SheetBinder, WriteSummary};
pub use coerce::{coerce, number_text, plain_decimal};
pub use config::{DateFormat, SheetConfig};
pub use diagnostics::{
    Collector, Diagnostic, DiagnosticKind, DiagnosticSink, FnSink, Severity, TracingSink,
};
pub use error::{BindError, CoercionError, Result};
pub use header::{HeaderMap, ResolvedColumnMap, resolve_header};
pub use materialize::{RowOutcome, materialize_row, materialize_rows, materialize_sheet};
pub use schema::{
    CellField, FieldDescriptor, FieldSchema, FieldSchemaBuilder, FieldValue, SheetRecord, TypeTag,
};
pub use serialize::{Grid, serialize};
pub use traits::{ContainerFormat, SheetData, SheetRow, SpreadsheetReader, SpreadsheetWriter};
pub use value::{CellValue, ErrorCode, datetime_to_serial, serial_to_datetime};

#[cfg(feature = "derive")]
pub use sheetbind_macros::SheetRecord;
