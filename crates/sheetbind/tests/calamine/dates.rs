// Date-formatted numeric cells through the calamine reader.

use crate::common::{build_workbook, text_row};
use chrono::{NaiveDate, NaiveDateTime};
use sheetbind::{CalamineAdapter, CellValue, SheetBinder, SheetRecord, SpreadsheetReader};

#[derive(Debug, Default, SheetRecord)]
struct Hire {
    #[sheet(name = "Name")]
    name: String,
    #[sheet(name = "Hired")]
    hired: Option<NaiveDateTime>,
    #[sheet(name = "Hired")]
    hired_text: String,
}

#[derive(Debug, Default, SheetRecord)]
struct HireAsText {
    #[sheet(name = "Hired")]
    hired: String,
}

fn date_workbook() -> (tempfile::TempDir, std::path::PathBuf) {
    build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        text_row(sh, 1, &["Name", "Hired"]);
        sh.get_cell_mut((1, 2)).set_value_string("Jo");
        // Excel 1900 date system serial for 2024-01-15.
        sh.get_cell_mut((2, 2)).set_value_number(45306.0);
        // Apply a built-in date number format so calamine yields Data::DateTime.
        let _ = sh
            .get_style_mut("B2")
            .get_number_format_mut()
            .set_format_code(umya_spreadsheet::NumberingFormat::FORMAT_DATE_XLSX14);
        sh.get_cell_mut((1, 3)).set_value_string("Kim");
        sh.get_cell_mut((2, 3)).set_value_string("2023-12-31 23:59:01");
    })
}

#[test]
fn date_formatted_cell_is_flagged_by_reader() {
    let (_dir, path) = date_workbook();
    let mut reader = CalamineAdapter::open_path(&path).expect("open via calamine");
    let sheet = reader.read_sheet("Sheet1").expect("read").expect("sheet");
    match sheet.get(1, 1) {
        Some(CellValue::Numeric {
            value,
            date_formatted: true,
        }) => assert_eq!(*value, 45306.0),
        other => panic!("Expected a date-formatted number at B2, got {other:?}"),
    }
}

#[test]
fn date_cell_fills_date_field() {
    let (_dir, path) = date_workbook();
    let outcome = SheetBinder::new(&path).parse::<Hire>().expect("parse");
    assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);
    let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(outcome.records[0].hired, Some(expected));
    // Duplicate display names: the first declared field owns the column.
    assert_eq!(outcome.records[0].hired_text, "");

    let parsed = NaiveDate::from_ymd_opt(2023, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 1)
        .unwrap();
    assert_eq!(outcome.records[1].hired, Some(parsed));
}

#[test]
fn date_cell_renders_into_string_field() {
    let (_dir, path) = date_workbook();
    let outcome = SheetBinder::new(&path).parse::<HireAsText>().expect("parse");
    assert_eq!(outcome.records[0].hired, "2024-01-15 00:00:00");

    let mut binder = SheetBinder::new(&path);
    binder.set_date_format("%d/%m/%Y").unwrap();
    let outcome = binder.parse::<HireAsText>().expect("parse");
    assert_eq!(outcome.records[0].hired, "15/01/2024");
}

#[test]
fn unparseable_date_text_is_low_severity() {
    let (_dir, path) = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        text_row(sh, 1, &["Name", "Hired"]);
        text_row(sh, 2, &["Lu", "next tuesday"]);
    });
    let outcome = SheetBinder::new(&path).parse::<Hire>().expect("parse");
    assert_eq!(outcome.records[0].name, "Lu");
    assert_eq!(outcome.records[0].hired, None);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(
        outcome.diagnostics[0].severity(),
        sheetbind::Severity::Debug
    );
}
