use crate::coerce::coerce;
use crate::config::{DateFormat, SheetConfig};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::header::{HeaderMap, ResolvedColumnMap, resolve_header};
use crate::schema::{FieldSchema, SheetRecord};
use crate::traits::{SheetData, SheetRow};

/// One materialized row and the cells that failed along the way.
#[derive(Debug)]
pub struct RowOutcome<T> {
    pub record: T,
    pub errors: Vec<Diagnostic>,
}

/// Populate a fresh record from one data row.
///
/// Unmapped columns are ignored. A cell that fails coercion leaves its field
/// at the default and is recorded in `errors`; the record is always produced.
pub fn materialize_row<T: SheetRecord>(
    schema: &FieldSchema<T>,
    resolved: &ResolvedColumnMap<'_>,
    row: &SheetRow<'_>,
    date_format: &DateFormat,
) -> RowOutcome<T> {
    let mut record = T::default();
    let mut errors = Vec::new();
    for (col, cell) in row.cells() {
        let Some(descriptor) = resolved.get(col) else {
            continue;
        };
        let result = coerce(cell, descriptor.type_tag(), date_format)
            .and_then(|value| schema.set(&mut record, descriptor, value));
        if let Err(err) = result {
            errors.push(Diagnostic::from_coercion(
                row.index,
                col,
                descriptor.display_name(),
                &err,
            ));
        }
    }
    RowOutcome { record, errors }
}

/// Materialize every row in input order. Per-cell errors go to `sink`.
pub fn materialize_rows<'a, T, S>(
    schema: &FieldSchema<T>,
    resolved: &ResolvedColumnMap<'_>,
    rows: impl IntoIterator<Item = SheetRow<'a>>,
    date_format: &DateFormat,
    sink: &mut S,
) -> Vec<T>
where
    T: SheetRecord,
    S: DiagnosticSink + ?Sized,
{
    rows.into_iter()
        .map(|row| {
            let outcome = materialize_row(schema, resolved, &row, date_format);
            for err in outcome.errors {
                sink.report(err);
            }
            outcome.record
        })
        .collect()
}

/// Read a whole sheet: locate the header row, resolve it against `T`'s
/// schema, then materialize every row below it.
///
/// A header row past the end of the sheet yields no records.
pub fn materialize_sheet<T, S>(sheet: &SheetData, config: &SheetConfig, sink: &mut S) -> Vec<T>
where
    T: SheetRecord,
    S: DiagnosticSink + ?Sized,
{
    let header_index = config.header_row_index();
    match sheet.last_row() {
        Some(last) if header_index <= last => {}
        _ => {
            tracing::debug!(
                sheet = sheet.name.as_str(),
                start_row = config.start_row,
                "header row is beyond the populated rows"
            );
            return Vec::new();
        }
    }

    let schema = T::schema();
    let header = HeaderMap::from_row(sheet.row(header_index).cells());
    let resolved = resolve_header(&schema, &header);
    if resolved.mapped_columns().next().is_none() {
        tracing::warn!(
            sheet = sheet.name.as_str(),
            header_cells = header.len(),
            "no header cell matches a mapped field"
        );
    }

    materialize_rows(
        &schema,
        &resolved,
        sheet.rows_after(header_index),
        &config.date_format,
        sink,
    )
}
