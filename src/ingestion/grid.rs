//! Header detection and row keying shared by the CSV and workbook readers.

use std::collections::HashSet;
use std::sync::Arc;

use crate::types::{Row, TabularDataset, Value};

const EMPTY_HEADER: &str = "__EMPTY";

/// Turn a decoded grid of cells into keyed rows.
///
/// - The first row with any non-null cell is the header; rows before it are ignored.
/// - The header spans the widest row of the grid. Empty header cells are named `__EMPTY`,
///   repeated names get `_1`, `_2`, ... suffixes.
/// - Blank rows after the header are skipped; short rows are padded with [`Value::Null`].
pub(crate) fn rows_from_grid(grid: Vec<Vec<Value>>) -> TabularDataset {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut remaining = grid.into_iter().skip_while(|row| is_blank(row));

    let Some(header_row) = remaining.next() else {
        return TabularDataset::empty();
    };
    let names = header_names(&header_row, width);

    let rows = remaining
        .filter(|cells| !is_blank(cells))
        .map(|cells| {
            let mut cells = cells.into_iter();
            let mut row = Row::new();
            for name in &names {
                row.push(Arc::clone(name), cells.next().unwrap_or(Value::Null));
            }
            row
        })
        .collect();

    TabularDataset::new(rows)
}

fn is_blank(cells: &[Value]) -> bool {
    cells.iter().all(Value::is_null)
}

fn header_names(header_row: &[Value], width: usize) -> Vec<Arc<str>> {
    let mut used: HashSet<String> = HashSet::with_capacity(width);
    let mut names = Vec::with_capacity(width);

    for idx in 0..width {
        let raw = header_row.get(idx).map(Value::to_string).unwrap_or_default();
        let base = if raw.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            raw
        };

        let mut name = base.clone();
        let mut suffix = 0usize;
        while used.contains(&name) {
            suffix += 1;
            name = format!("{base}_{suffix}");
        }
        used.insert(name.clone());
        names.push(Arc::from(name));
    }

    names
}

#[cfg(test)]
mod tests {
    use super::rows_from_grid;
    use crate::types::Value;

    fn text(s: &str) -> Value {
        Value::text(s)
    }

    #[test]
    fn leading_blank_rows_are_skipped_before_header() {
        let grid = vec![
            vec![Value::Null, Value::Null],
            vec![text("id"), text("name")],
            vec![text("1"), text("Ada")],
        ];
        let ds = rows_from_grid(grid);
        assert_eq!(ds.row_count(), 1);
        assert_eq!(ds.rows()[0].keys().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn empty_and_duplicate_headers_get_unique_names() {
        let grid = vec![
            vec![text("a"), Value::Null, text("a"), Value::Null],
            vec![text("1"), text("2"), text("3"), text("4")],
        ];
        let ds = rows_from_grid(grid);
        assert_eq!(
            ds.rows()[0].keys().collect::<Vec<_>>(),
            vec!["a", "__EMPTY", "a_1", "__EMPTY_1"]
        );
    }

    #[test]
    fn short_rows_are_padded_and_blank_rows_dropped() {
        let grid = vec![
            vec![text("x"), text("y")],
            vec![Value::Null, Value::Null],
            vec![text("1")],
        ];
        let ds = rows_from_grid(grid);
        assert_eq!(ds.row_count(), 1);
        assert_eq!(ds.rows()[0].get("y"), Some(&Value::Null));
    }

    #[test]
    fn all_blank_grid_is_empty() {
        assert!(rows_from_grid(vec![vec![Value::Null]]).is_empty());
        assert!(rows_from_grid(Vec::new()).is_empty());
    }
}
