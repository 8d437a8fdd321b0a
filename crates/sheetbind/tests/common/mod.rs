// Shared test helpers (umya workbook builders, etc.)
#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

/// Build an `.xlsx` fixture with umya and write it into a fresh temp dir.
///
/// The workbook starts with an empty `Sheet1`. Keep the returned `TempDir`
/// alive for as long as the path is used.
pub fn build_workbook<F>(fill: F) -> (TempDir, PathBuf)
where
    F: FnOnce(&mut umya_spreadsheet::Spreadsheet),
{
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("fixture.xlsx");
    let mut book = umya_spreadsheet::new_file();
    fill(&mut book);
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write fixture");
    (dir, path)
}

/// Write a row of text cells starting at column A. `row` is 1-based.
pub fn text_row(sheet: &mut umya_spreadsheet::Worksheet, row: u32, values: &[&str]) {
    for (i, v) in values.iter().enumerate() {
        sheet
            .get_cell_mut((i as u32 + 1, row))
            .set_value_string(*v);
    }
}

/// Path for an output file inside a fresh temp dir.
pub fn temp_target(file_name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(file_name);
    (dir, path)
}
