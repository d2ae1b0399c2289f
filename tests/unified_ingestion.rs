use tabular_upload::ingestion::{ingest, ingest_with_options, IngestionOptions, SUPPORTED_EXTENSIONS};
use tabular_upload::schema::derive_columns;
use tabular_upload::types::{ColumnDef, Row, Value};
use tabular_upload::IngestionError;

fn read_fixture(name: &str) -> Vec<u8> {
    std::fs::read(format!("tests/fixtures/{name}")).unwrap()
}

#[test]
fn unified_ingest_csv_scenario() {
    let ds = ingest(&read_fixture("data.csv"), "csv").unwrap();

    assert_eq!(
        ds.rows(),
        &[Row::from_pairs([
            ("Name", Value::Utf8("Alice".to_string())),
            ("Age", Value::Utf8("30".to_string())),
        ])]
    );
    assert_eq!(derive_columns(&ds), vec![ColumnDef::new("Name"), ColumnDef::new("Age")]);
}

#[test]
fn unified_ingest_row_count_and_column_order() {
    let ds = ingest(&read_fixture("people.csv"), "csv").unwrap();
    assert_eq!(ds.row_count(), 2);
    let names: Vec<String> = derive_columns(&ds).into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["id", "name", "score", "active"]);
}

#[test]
fn unified_ingest_header_only_and_empty_files() {
    for fixture in ["header_only.csv", "empty.csv"] {
        let ds = ingest(&read_fixture(fixture), "csv").unwrap();
        assert!(ds.is_empty(), "{fixture} should be empty");
        assert!(derive_columns(&ds).is_empty());
    }
}

#[test]
fn unified_ingest_unsupported_extension() {
    for ext in ["png", "json", "txt", "", "xlsm"] {
        let err = ingest(b"Name,Age\nAlice,30\n", ext).unwrap_err();
        assert!(
            matches!(&err, IngestionError::UnsupportedFormat { extension } if extension == ext),
            "unexpected error for '{ext}': {err}"
        );
        assert!(!err.is_parse_error());
    }
}

#[test]
fn unified_ingest_extension_case_insensitive() {
    let lower = ingest(&read_fixture("data.csv"), "csv").unwrap();
    let upper = ingest(&read_fixture("data.csv"), "CSV").unwrap();
    assert_eq!(lower, upper);
}

#[test]
fn unified_ingest_is_deterministic() {
    let bytes = read_fixture("ragged.csv");
    let a = ingest(&bytes, "csv").unwrap();
    let b = ingest(&bytes, "csv").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
}

#[test]
fn unified_ingest_custom_delimiter() {
    let opts = IngestionOptions {
        csv_delimiter: b'\t',
        ..Default::default()
    };
    let ds = ingest_with_options(b"a\tb\n1\t2\n", "csv", &opts).unwrap();
    assert_eq!(ds.rows()[0].get("b"), Some(&Value::Utf8("2".to_string())));
}

#[cfg(feature = "excel")]
#[test]
fn supported_extensions_all_dispatch() {
    assert_eq!(SUPPORTED_EXTENSIONS, ["csv", "xlsx", "xls"]);
    for ext in SUPPORTED_EXTENSIONS {
        // Garbage bytes must never be reported as an unsupported format for these.
        if let Err(err) = ingest(b"\x00\x01garbage", ext) {
            assert!(!matches!(err, IngestionError::UnsupportedFormat { .. }), "{ext}: {err}");
        }
    }
}

#[test]
fn dataset_json_preserves_column_order() {
    let ds = ingest(&read_fixture("data.csv"), "csv").unwrap();
    assert_eq!(ds.to_json().unwrap(), r#"[{"Name":"Alice","Age":"30"}]"#);
}
