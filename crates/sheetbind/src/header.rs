use std::collections::BTreeMap;

use crate::schema::{FieldDescriptor, FieldSchema};
use crate::value::CellValue;

/// Column position → header text, read from the header row.
///
/// Positions are the zero-based columns reported by the backend and may be
/// sparse; blank header cells have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: BTreeMap<u32, String>,
}

impl HeaderMap {
    pub fn from_row<'a>(cells: impl IntoIterator<Item = (u32, &'a CellValue)>) -> Self {
        let columns = cells
            .into_iter()
            .filter_map(|(col, cell)| cell.header_text().map(|text| (col, text)))
            .collect();
        Self { columns }
    }

    pub fn get(&self, col: u32) -> Option<&str> {
        self.columns.get(&col).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.columns.iter().map(|(c, s)| (*c, s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Column position → field descriptor, borrowed from the schema.
///
/// Columns whose header matches no field map to `None`; columns absent from
/// the header row are not in the map at all. Both are skipped when reading.
#[derive(Debug, Clone, Default)]
pub struct ResolvedColumnMap<'s> {
    columns: BTreeMap<u32, Option<&'s FieldDescriptor>>,
}

impl<'s> ResolvedColumnMap<'s> {
    pub fn get(&self, col: u32) -> Option<&'s FieldDescriptor> {
        self.columns.get(&col).copied().flatten()
    }

    pub fn mapped_columns(&self) -> impl Iterator<Item = (u32, &'s FieldDescriptor)> + '_ {
        self.columns
            .iter()
            .filter_map(|(col, d)| d.map(|d| (*col, d)))
    }

    pub fn unmapped_columns(&self) -> impl Iterator<Item = u32> + '_ {
        self.columns
            .iter()
            .filter(|(_, d)| d.is_none())
            .map(|(col, _)| *col)
    }
}

/// Match each header cell against the schema's display names.
///
/// Matching is exact string equality. When two header cells carry the same
/// text both columns resolve to the same field, and the rightmost value read
/// for a row is the one kept.
pub fn resolve_header<'s, T>(schema: &'s FieldSchema<T>, header: &HeaderMap) -> ResolvedColumnMap<'s> {
    let columns = header
        .iter()
        .map(|(col, text)| (col, schema.by_name(text)))
        .collect();
    ResolvedColumnMap { columns }
}
