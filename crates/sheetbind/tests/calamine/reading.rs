use crate::common::{build_workbook, text_row};
use sheetbind::{
    CalamineAdapter, CellValue, DiagnosticKind, SheetBinder, SheetRecord, SpreadsheetReader,
};

#[derive(Debug, Default, PartialEq, SheetRecord)]
struct Employee {
    #[sheet(name = "Name", order = 1)]
    name: String,
    #[sheet(name = "Age", order = 2)]
    age: i32,
    #[sheet(name = "Active", order = 3)]
    active: bool,
    #[sheet(name = "Badge", order = 4)]
    badge: String,
    notes: String,
}

#[test]
fn reads_typed_records_regardless_of_column_order() {
    let (_dir, path) = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        text_row(sh, 1, &["Badge", "Active", "Comment", "Age", "Name"]);

        sh.get_cell_mut((1, 2)).set_value_string("B-7");
        sh.get_cell_mut((2, 2)).set_value_bool(true);
        sh.get_cell_mut((3, 2)).set_value_string("ignored");
        sh.get_cell_mut((4, 2)).set_value_number(34.0);
        sh.get_cell_mut((5, 2)).set_value_string("Ada");

        sh.get_cell_mut((4, 3)).set_value_number(51.9);
        sh.get_cell_mut((5, 3)).set_value_string("Brian");
    });

    let outcome = SheetBinder::new(&path).parse::<Employee>().expect("parse");
    assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);
    assert_eq!(
        outcome.records,
        vec![
            Employee {
                name: "Ada".into(),
                age: 34,
                active: true,
                badge: "B-7".into(),
                notes: String::new(),
            },
            Employee {
                name: "Brian".into(),
                age: 51,
                ..Employee::default()
            },
        ]
    );
}

#[test]
fn bad_cells_become_diagnostics_and_rows_survive() {
    let (_dir, path) = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        text_row(sh, 1, &["Name", "Age", "Active"]);
        sh.get_cell_mut((1, 2)).set_value_string("Cleo");
        sh.get_cell_mut((2, 2)).set_value_bool(false);
        sh.get_cell_mut((3, 2)).set_value_number(1.0);
    });

    let outcome = SheetBinder::new(&path).parse::<Employee>().expect("parse");
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].name, "Cleo");
    assert_eq!(outcome.records[0].age, 0);
    assert!(!outcome.records[0].active);

    let kinds: Vec<_> = outcome.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::Coercion, DiagnosticKind::Coercion]);
    assert_eq!(outcome.diagnostics[0].field.as_deref(), Some("Age"));
    assert_eq!(outcome.diagnostics[0].row, Some(1));
}

#[test]
fn long_identifier_numbers_read_as_plain_digits() {
    let (_dir, path) = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        text_row(sh, 1, &["Name", "Badge"]);
        sh.get_cell_mut((1, 2)).set_value_string("Dee");
        sh.get_cell_mut((2, 2)).set_value_number(123456789012345678.0);
        sh.get_cell_mut((1, 3)).set_value_string("Eve");
        sh.get_cell_mut((2, 3)).set_value_number(3.0);
        sh.get_cell_mut((1, 4)).set_value_string("Gus");
        sh.get_cell_mut((2, 4)).set_value_number(13800138000.0);
    });

    let outcome = SheetBinder::new(&path).parse::<Employee>().expect("parse");
    assert_eq!(outcome.records[0].badge, "123456789012345680");
    assert_eq!(outcome.records[1].badge, "3.0");
    assert_eq!(outcome.records[2].badge, "13800138000");
}

#[test]
fn formula_cells_yield_their_source() {
    let (_dir, path) = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        text_row(sh, 1, &["Name", "Badge"]);
        sh.get_cell_mut((1, 2)).set_value_string("Fay");
        sh.get_cell_mut((2, 2)).set_formula("LEN(A2)");
    });

    let mut reader = CalamineAdapter::open_path(&path).expect("open via calamine");
    let sheet = reader.read_sheet("Sheet1").expect("read").expect("sheet");
    assert!(matches!(sheet.get(1, 1), Some(CellValue::Formula(_))));

    let outcome = SheetBinder::new(&path).parse::<Employee>().expect("parse");
    assert_eq!(outcome.records[0].badge, "LEN(A2)");
}

#[test]
fn missing_sheet_yields_no_records() {
    let (_dir, path) = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        text_row(sh, 1, &["Name"]);
        text_row(sh, 2, &["Gus"]);
    });

    let mut binder = SheetBinder::new(&path);
    binder.set_sheet_name("Payroll");
    let outcome = binder.parse::<Employee>().expect("parse");
    assert!(outcome.records.is_empty());
    assert!(outcome.is_clean());
}

#[test]
fn start_row_skips_preamble() {
    let (_dir, path) = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        text_row(sh, 1, &["Staff list, exported nightly"]);
        text_row(sh, 3, &["Name", "Badge"]);
        text_row(sh, 4, &["Hal", "B-1"]);
        text_row(sh, 5, &["Ivy", "B-2"]);
    });

    let mut binder = SheetBinder::new(&path);
    binder.set_start_row(3).unwrap();
    let outcome = binder.parse::<Employee>().expect("parse");
    let names: Vec<_> = outcome.records.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Hal", "Ivy"]);

    binder.set_start_row(40).unwrap();
    assert!(binder.parse::<Employee>().expect("parse").records.is_empty());
}

#[test]
fn unreadable_container_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not a zip archive").unwrap();
    let err = SheetBinder::new(&path).parse::<Employee>().unwrap_err();
    assert!(matches!(err, sheetbind::BindError::Container { .. }), "{err}");
}
