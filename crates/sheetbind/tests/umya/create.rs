use crate::common::temp_target;
use sheetbind::{
    BindError, CalamineAdapter, CellValue, SheetBinder, SheetConfig, SheetRecord,
    SpreadsheetReader, UmyaAdapter,
};

#[derive(Debug, Default, Clone, PartialEq, SheetRecord)]
struct Contact {
    #[sheet(name = "Phone", order = 3)]
    phone: String,
    #[sheet(name = "Name", order = 1)]
    name: String,
    #[sheet(name = "Email", order = 2)]
    email: String,
}

fn contacts() -> Vec<Contact> {
    vec![
        Contact {
            phone: "555-0100".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
        },
        Contact {
            phone: "".into(),
            name: "Bo".into(),
            email: "bo@example.com".into(),
        },
        Contact {
            phone: "0044 20 7946 0000".into(),
            name: "Cai".into(),
            email: "".into(),
        },
    ]
}

#[test]
fn create_then_parse_round_trips() {
    let (_dir, path) = temp_target("contacts.xlsx");
    let binder = SheetBinder::new(&path);

    let summary = binder.create_excel(&contacts()).expect("write");
    assert!(path.exists());
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.columns, 3);
    assert_eq!(summary.sheet, "Sheet1");

    let outcome = binder.parse::<Contact>().expect("read back");
    assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.records, contacts());
}

#[test]
fn trailing_blank_record_survives_round_trip() {
    let (_dir, path) = temp_target("blank_tail.xlsx");
    let binder = SheetBinder::new(&path);
    let mut rows = contacts();
    rows.push(Contact::default());

    let summary = binder.create_excel(&rows).expect("write");
    assert_eq!(summary.rows_written, 4);

    let outcome = binder.parse::<Contact>().expect("read back");
    assert_eq!(outcome.records, rows);
}

#[test]
fn header_follows_declared_order() {
    let (_dir, path) = temp_target("ordered.xlsx");
    SheetBinder::new(&path)
        .create_excel(&contacts())
        .expect("write");

    let mut reader = CalamineAdapter::open_path(&path).expect("open via calamine");
    let sheet = reader.read_sheet("Sheet1").expect("read").expect("sheet");
    let header: Vec<_> = sheet.row(0).cells().map(|(_, v)| v.raw_text()).collect();
    assert_eq!(header, vec!["Name", "Email", "Phone"]);
    assert_eq!(sheet.get(1, 2), Some(&CellValue::text("555-0100")));
}

#[test]
fn numeric_looking_text_stays_text() {
    #[derive(Debug, Default, SheetRecord)]
    struct Code {
        #[sheet(name = "Code")]
        code: String,
    }

    let (_dir, path) = temp_target("codes.xlsx");
    let binder = SheetBinder::new(&path);
    binder
        .create_excel(&[Code { code: "007".into() }])
        .expect("write");

    let outcome = binder.parse::<Code>().expect("read back");
    assert_eq!(outcome.records[0].code, "007");
}

#[test]
fn custom_sheet_name_is_used_both_ways() {
    let (_dir, path) = temp_target("named.xlsx");
    let config = SheetConfig::default().with_sheet_name("People");
    let binder = SheetBinder::with_config(&path, config).unwrap();
    binder.create_excel(&contacts()).expect("write");

    let mut reader = CalamineAdapter::open_path(&path).expect("open via calamine");
    assert_eq!(reader.sheet_names().unwrap(), vec!["People".to_string()]);
    assert_eq!(binder.parse::<Contact>().unwrap().records.len(), 3);
}

#[test]
fn empty_input_writes_nothing() {
    let (_dir, path) = temp_target("empty.xlsx");
    let err = SheetBinder::new(&path)
        .create_excel::<Contact>(&[])
        .unwrap_err();
    assert!(matches!(err, BindError::NothingToWrite));
    assert!(!path.exists());
}

#[test]
fn legacy_targets_are_unsupported_for_writing() {
    let (_dir, path) = temp_target("old.xls");
    let err = SheetBinder::new(&path)
        .create_excel(&contacts())
        .unwrap_err();
    assert!(matches!(err, BindError::UnsupportedFormat { .. }));
}

#[test]
fn write_to_explicit_adapter() {
    let (_dir, path) = temp_target("explicit.xlsx");
    let mut writer = UmyaAdapter::create(&path);
    let summary = SheetBinder::new(&path)
        .write_to(&mut writer, &contacts())
        .expect("write");
    assert_eq!(summary.rows_written, 3);
    assert!(path.exists());
}
