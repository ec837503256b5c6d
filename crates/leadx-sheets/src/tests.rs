use std::fs;
use std::path::PathBuf;

use crate::errors::SheetError;
use crate::model::{column_letter, SheetColumn, EMPTY_CELL};
use crate::read_sheet;

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn reads_headers_as_lettered_columns() {
    let sheet = read_sheet(&fixture("q1_leads_master.csv")).expect("sheet parse failed");

    assert_eq!(sheet.columns.len(), 8);
    assert_eq!(sheet.row_count(), 10);
    assert_eq!(sheet.labels()[0], "Column A – Full Name");
    assert_eq!(sheet.labels()[1], "Column B – Email Address");
    assert_eq!(sheet.labels()[7], "Column H – Company");
}

#[test]
fn cells_resolve_by_label_letter_or_header() {
    let sheet = read_sheet(&fixture("q1_leads_master.csv")).expect("sheet parse failed");

    assert_eq!(sheet.cell(0, "Column B – Email Address"), Some("sarah@acme.co"));
    assert_eq!(sheet.cell(0, "b"), Some("sarah@acme.co"));
    assert_eq!(sheet.cell(0, "email address"), Some("sarah@acme.co"));
    assert_eq!(sheet.cell(3, "Column B – Email Address"), None);
    assert_eq!(sheet.preview_cell(3, "Column B – Email Address"), EMPTY_CELL);
    assert_eq!(sheet.preview_cell(0, "Column Z – Nothing"), EMPTY_CELL);
    assert_eq!(sheet.preview_cell(99, "A"), EMPTY_CELL);
}

#[test]
fn blank_rows_are_dropped() {
    let sheet = read_sheet(&fixture("webinar_signups.csv")).expect("sheet parse failed");

    assert_eq!(sheet.row_count(), 3);
    assert_eq!(sheet.cell(1, "Attendee"), Some("Owen Brooks"));
    assert_eq!(sheet.line(0), 2);
    assert_eq!(sheet.line(1), 4);
    assert_eq!(sheet.line(2), 5);
}

#[test]
fn short_rows_are_padded() {
    let sheet = read_sheet("Name,Email,Phone\nAda,ada@engine.org\n").expect("sheet parse failed");

    assert_eq!(sheet.rows[0].len(), 3);
    assert_eq!(sheet.cell(0, "Phone"), None);
}

#[test]
fn rejects_rows_wider_than_header() {
    let err = read_sheet(&fixture("ragged_row.csv")).unwrap_err();

    match err {
        SheetError::DataRow { line_index, .. } => assert_eq!(line_index, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_missing_or_blank_header() {
    assert!(matches!(read_sheet(""), Err(SheetError::MissingHeader)));
    assert!(matches!(
        read_sheet(",,\nA,B,C\n"),
        Err(SheetError::InvalidHeader { .. })
    ));
}

#[test]
fn unknown_columns_are_reported() {
    let sheet = read_sheet("Name\nAda\n").expect("sheet parse failed");

    let err = sheet.resolve("Column Q – Revenue").unwrap_err();
    assert_eq!(err.to_string(), "unknown column 'Column Q – Revenue'");
}

#[test]
fn column_letters_roll_over_past_z() {
    assert_eq!(column_letter(0), "A");
    assert_eq!(column_letter(25), "Z");
    assert_eq!(column_letter(26), "AA");
    assert_eq!(column_letter(27), "AB");
    assert_eq!(column_letter(701), "ZZ");
    assert_eq!(column_letter(702), "AAA");
}

#[test]
fn unnamed_column_label_is_letter_only() {
    assert_eq!(SheetColumn::new(2, "").label(), "Column C");
}
