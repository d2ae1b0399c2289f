use tabular_upload::ingestion::csv::{ingest_csv_from_bytes, ingest_csv_from_reader};
use tabular_upload::types::Value;

fn text(s: &str) -> Value {
    Value::Utf8(s.to_string())
}

#[test]
fn ingest_csv_from_bytes_happy_path() {
    let bytes = std::fs::read("tests/fixtures/people.csv").unwrap();
    let ds = ingest_csv_from_bytes(&bytes, b',').unwrap();

    assert_eq!(ds.row_count(), 2);
    assert_eq!(
        ds.rows()[0].iter().collect::<Vec<_>>(),
        vec![
            ("id", &text("1")),
            ("name", &text("Ada")),
            ("score", &text("98.5")),
            ("active", &text("true")),
        ]
    );
}

#[test]
fn ingest_csv_keeps_header_order() {
    let input = "name,id,active,score\nAda,1,true,98.5\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(input.as_bytes());

    let ds = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(
        ds.rows()[0].keys().collect::<Vec<_>>(),
        vec!["name", "id", "active", "score"]
    );
}

#[test]
fn ingest_csv_header_only_is_empty_dataset() {
    let bytes = std::fs::read("tests/fixtures/header_only.csv").unwrap();
    let ds = ingest_csv_from_bytes(&bytes, b',').unwrap();
    assert!(ds.is_empty());

    let ds = ingest_csv_from_bytes(b"", b',').unwrap();
    assert!(ds.is_empty());
}

#[test]
fn ingest_csv_ragged_rows_and_odd_headers() {
    let bytes = std::fs::read("tests/fixtures/ragged.csv").unwrap();
    let ds = ingest_csv_from_bytes(&bytes, b',').unwrap();

    assert_eq!(ds.row_count(), 2);
    let north = &ds.rows()[0];
    assert_eq!(
        north.keys().collect::<Vec<_>>(),
        vec!["region", "__EMPTY", "region_1", "total", "__EMPTY_1"]
    );
    assert_eq!(north.get("region_1"), Some(&text("n2")));
    assert_eq!(north.get("total"), Some(&Value::Null));

    let south = &ds.rows()[1];
    assert_eq!(south.get("total"), Some(&text("40")));
    assert_eq!(south.get("__EMPTY_1"), Some(&text("extra")));
}

#[test]
fn ingest_csv_quoted_fields() {
    let input = b"title,notes\n\"Hello, world\",\"line one\nline two\"\n";
    let ds = ingest_csv_from_bytes(input, b',').unwrap();
    assert_eq!(ds.rows()[0].get("title"), Some(&text("Hello, world")));
    assert_eq!(ds.rows()[0].get("notes"), Some(&text("line one\nline two")));
}

#[test]
fn ingest_csv_errors_on_invalid_utf8() {
    let err = ingest_csv_from_bytes(b"name\n\xC3\x28\n", b',').unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("csv parse error"));
}
