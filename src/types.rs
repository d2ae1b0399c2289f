//! Core data model types for uploads.
//!
//! Ingestion turns file bytes into a [`TabularDataset`]: an ordered list of [`Row`]s, each mapping
//! column names to typed [`Value`]s. Column descriptors ([`ColumnDef`]) are derived from the
//! dataset afterwards, see [`crate::schema`].

use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A single cell value in a [`Row`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text cell helper: empty strings map to [`Value::Null`].
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() { Value::Null } else { Value::Utf8(s) }
    }
}

/// Display text used by grids: nulls render empty, integral floats render without a fraction.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(i) => write!(f, "{i}"),
            Value::Float64(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

/// One record of a [`TabularDataset`]: an ordered mapping from column name to [`Value`].
///
/// Column names are shared (`Arc<str>`) between rows produced by the same ingestion call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(Arc<str>, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(name, value)` pairs, preserving their order.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            cells: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Append a cell. Keys are expected to be unique within a row.
    pub fn push(&mut self, name: impl Into<Arc<str>>, value: Value) {
        self.cells.push((name.into(), value));
    }

    /// Look up a cell by column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_ref())
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Number of cells in this row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k.as_ref(), v)?;
        }
        map.end()
    }
}

/// In-memory tabular dataset produced by one ingestion call.
///
/// Never mutated after ingestion; the workflow shares it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TabularDataset {
    rows: Vec<Row>,
}

impl TabularDataset {
    /// Create a dataset from rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// An empty dataset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `true` if the dataset holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The first row, which defines the dataset's columns.
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Render the dataset as a JSON array of objects (keys in column order).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A named column descriptor handed to preview surfaces and submitters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    /// Field/column name (the key in each [`Row`]).
    pub name: String,
    /// Header text shown to users; defaults to `name`.
    pub label: String,
}

impl ColumnDef {
    /// Create a column whose label equals its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
        }
    }

    /// Override the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Name and extension of the file the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMeta {
    /// File name as selected, e.g. `Report.XLSX`.
    pub original_name: String,
    /// Text after the last `.` of the name, as written (may be empty). Matching is case-insensitive.
    pub extension: String,
}

impl FileMeta {
    /// Create file metadata from explicit parts.
    pub fn new(original_name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            extension: extension.into(),
        }
    }

    /// Split a file name at its last dot. Names without a dot get an empty extension.
    pub fn from_file_name(name: impl Into<String>) -> Self {
        let original_name = name.into();
        let extension = match original_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_string(),
            None => String::new(),
        };
        Self {
            original_name,
            extension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_meta_splits_at_last_dot() {
        let meta = FileMeta::from_file_name("q3.report.XLSX");
        assert_eq!(meta.original_name, "q3.report.XLSX");
        assert_eq!(meta.extension, "XLSX");

        assert_eq!(FileMeta::from_file_name("README").extension, "");
    }

    #[test]
    fn row_serializes_as_ordered_object() {
        let row = Row::from_pairs([
            ("Name", Value::Utf8("Alice".to_string())),
            ("Age", Value::Int64(30)),
            ("Note", Value::Null),
        ]);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Name":"Alice","Age":30,"Note":null}"#);
    }

    #[test]
    fn value_display_drops_integral_fraction() {
        assert_eq!(Value::Float64(30.0).to_string(), "30");
        assert_eq!(Value::Float64(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn column_label_defaults_to_name() {
        let col = ColumnDef::new("Age");
        assert_eq!(col.label, "Age");
        assert_eq!(col.with_label("Age (years)").label, "Age (years)");
    }
}
