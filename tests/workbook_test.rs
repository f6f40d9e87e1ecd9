mod common;

use chrono::NaiveDate;
use common::*;
use tempfile::TempDir;
use vaccine_loader::database::value::Value;
use vaccine_loader::spreadsheet::open_workbook;
use vaccine_loader::spreadsheet::ReadOptions;
use vaccine_loader::spreadsheet::Spreadsheet;

fn write(directory: &TempDir, builder: WorkbookBuilder) -> String {
    let path = directory.path().join("workbook.xlsx");
    builder.write(&path);
    path.to_string_lossy().into_owned()
}

fn patients() -> WorkbookBuilder {
    WorkbookBuilder::new().sheet("Patients", vec![
        header(&["ssNo", "name", "date of birth", "vaccinated"]),
        vec![text("010190-111C"), text("Liisa & Matti"), Cell::Date(32874), Cell::Bool(true)],
        vec![],
        vec![text("020202-222D"), Cell::Empty, Cell::Error("#N/A".to_owned()), Cell::Bool(false)],
        vec![Cell::Empty, Cell::Empty, Cell::Error("#REF!".to_owned())],
    ])
}

#[test]
fn reads_typed_cells_and_skips_blank_rows() {
    let directory = tempfile::tempdir().unwrap();
    let location = write(&directory, patients());
    let mut workbook = open_workbook(&location, ReadOptions::default()).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Patients"]);

    let table = workbook.read_sheet("Patients").unwrap();
    assert_eq!(table.columns, vec!["ssNo", "name", "date of birth", "vaccinated"]);
    assert_eq!(table.rows, vec![
        vec![
            Value::from("010190-111C"),
            Value::from("Liisa & Matti"),
            Value::Date(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
            Value::Boolean(true),
        ],
        vec![Value::from("020202-222D"), Value::Null, Value::Null, Value::Boolean(false)],
    ]);
}

#[test]
fn shared_strings_resolve_like_inline_strings() {
    let directory = tempfile::tempdir().unwrap();
    let location = write(&directory, patients().with_shared_strings());
    let mut workbook = open_workbook(&location, ReadOptions::default()).unwrap();

    let table = workbook.read_sheet("Patients").unwrap();
    assert_eq!(table.columns[1], "name");
    assert_eq!(table.rows[0][1], Value::from("Liisa & Matti"));
    assert_eq!(table.rows[1][0], Value::from("020202-222D"));
}

#[test]
fn strict_cells_reject_error_values() {
    let directory = tempfile::tempdir().unwrap();
    let location = write(&directory, patients());
    let mut workbook = open_workbook(&location, ReadOptions { error_as_null: false }).unwrap();

    let error = workbook.read_sheet("Patients").unwrap_err();
    assert!(error.to_string().contains("C4"), "{error}");
    assert!(error.to_string().contains("#N/A"), "{error}");
}

#[test]
fn numbers_keep_their_type() {
    let directory = tempfile::tempdir().unwrap();
    let location = write(&directory, WorkbookBuilder::new().sheet("VaccineBatch", vec![
        header(&["batchID", "amount", "ratio", "serial"]),
        vec![text("B1"), number(500), number(0.25), number(43831)],
    ]));
    let mut workbook = open_workbook(&location, ReadOptions::default()).unwrap();

    let table = workbook.read_sheet("VaccineBatch").unwrap();
    assert_eq!(table.rows[0], vec![Value::from("B1"), Value::Integer(500), Value::Double(0.25), Value::Integer(43831)]);
}

#[test]
fn sheets_are_listed_in_workbook_order() {
    let directory = tempfile::tempdir().unwrap();
    let location = write(&directory, vaccine_workbook());
    let workbook = open_workbook(&location, ReadOptions::default()).unwrap();

    let names = workbook.sheet_names();
    assert_eq!(names.len(), 12);
    assert_eq!(names.first().map(String::as_str), Some("VaccineType"));
    assert_eq!(names.last().map(String::as_str), Some("Diagnosis"));
    assert!(names.contains(&"Transportation log".to_owned()));
}

#[test]
fn missing_sheet_is_named_in_error() {
    let directory = tempfile::tempdir().unwrap();
    let location = write(&directory, patients());
    let mut workbook = open_workbook(&location, ReadOptions::default()).unwrap();

    let error = workbook.read_sheet("Diagnosis").unwrap_err();
    assert!(error.to_string().contains("Sheet 'Diagnosis' not found"), "{error}");
}

#[test]
fn missing_workbook_names_the_path() {
    let error = open_workbook("no/such/workbook.xlsx", ReadOptions::default()).err().unwrap();
    assert!(error.to_string().starts_with("Open workbook 'no/such/workbook.xlsx'"), "{error}");
}

#[test]
fn non_zip_file_is_rejected() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("workbook.xlsx");
    std::fs::write(&path, "ssNo,name\n010190-111C,Liisa\n").unwrap();

    assert!(open_workbook(&path.to_string_lossy(), ReadOptions::default()).is_err());
}
