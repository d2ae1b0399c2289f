#![cfg(feature = "excel")]

use tabular_upload::ingestion::excel::ingest_excel_from_bytes;
use tabular_upload::ingestion::ingest;
use tabular_upload::schema::derive_columns;
use tabular_upload::types::{ColumnDef, Value};

// Legacy BIFF8 workbook: sheet "People" (id, name, score, active + 2 rows), then sheet "Notes".
fn people_xls() -> Vec<u8> {
    std::fs::read("tests/fixtures/people.xls").unwrap()
}

#[test]
fn ingest_xls_reads_first_sheet_keyed_by_header() {
    let ds = ingest(&people_xls(), "xls").unwrap();

    assert_eq!(ds.row_count(), 2);
    let ada = &ds.rows()[0];
    assert_eq!(ada.keys().collect::<Vec<_>>(), vec!["id", "name", "score", "active"]);
    assert_eq!(ada.get("id"), Some(&Value::Float64(1.0)));
    assert_eq!(ada.get("name"), Some(&Value::Utf8("Ada".to_string())));
    assert_eq!(ada.get("score"), Some(&Value::Float64(98.5)));
    assert_eq!(ada.get("active"), Some(&Value::Bool(true)));

    let grace = &ds.rows()[1];
    assert_eq!(grace.get("name"), Some(&Value::Utf8("Grace".to_string())));
    assert_eq!(grace.get("active"), Some(&Value::Null));
}

#[test]
fn ingest_xls_ignores_later_sheets() {
    let ds = ingest(&people_xls(), "xls").unwrap();
    assert!(ds.rows().iter().all(|row| row.get("other").is_none()));
    assert!(ds.rows().iter().all(|row| row.len() == 4));
}

#[test]
fn ingest_xls_extension_is_case_insensitive() {
    let bytes = people_xls();
    assert_eq!(ingest(&bytes, "XLS").unwrap(), ingest(&bytes, "xls").unwrap());
}

#[test]
fn xls_columns_follow_header_order() {
    let ds = ingest_excel_from_bytes(&people_xls()).unwrap();
    assert_eq!(
        derive_columns(&ds),
        vec![
            ColumnDef::new("id"),
            ColumnDef::new("name"),
            ColumnDef::new("score"),
            ColumnDef::new("active"),
        ]
    );
}

#[test]
fn xls_preview_text_drops_integral_fraction() {
    let ds = ingest(&people_xls(), "xls").unwrap();
    assert_eq!(ds.rows()[1].get("id").map(ToString::to_string), Some("2".to_string()));
}
