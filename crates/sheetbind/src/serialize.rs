use crate::error::BindError;
use crate::schema::{FieldSchema, SheetRecord};

/// Text grid produced from a record sequence: one header row followed by one
/// row per record, columns in ascending field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    /// Every cell as zero-based `(row, col, text)`; the header is row 0.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &str)> + '_ {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(c, text)| (r as u32, c as u32, text.as_str()))
            })
    }

    /// Header row included.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// Lay records out as a text grid.
///
/// Empty input is rejected; there is no header to infer a layout from.
pub fn serialize<T: SheetRecord>(schema: &FieldSchema<T>, records: &[T]) -> Result<Grid, BindError> {
    if records.is_empty() {
        return Err(BindError::NothingToWrite);
    }
    let columns = schema.ordered();
    let header = columns
        .iter()
        .map(|d| d.display_name().to_string())
        .collect();
    let rows = records
        .iter()
        .map(|record| columns.iter().map(|d| schema.text(record, d)).collect())
        .collect();
    Ok(Grid { header, rows })
}
