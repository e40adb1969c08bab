use serde::{Deserialize, Serialize};

/// An HTML table flattened to text, before any renaming or coercion.
///
/// Spanning cells have already been expanded, so `rows[r][c]` is the text
/// shown at logical row `r`, column `c`. Rows may be shorter than the
/// widest row when the source omitted trailing cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Header labels, one per column position (multi-row headers are joined with a space).
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Number of column positions: the widest of the header and every body row.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// Cell text at `(row, col)`, or `None` if the row is short.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_uses_widest_row() {
        let table = RawTable {
            headers: vec!["A".into(), "B".into()],
            rows: vec![vec!["1".into()], vec!["1".into(), "2".into(), "3".into()]],
        };
        assert_eq!(table.width(), 3);
        assert_eq!(table.cell(0, 0), Some("1"));
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(5, 0), None);
    }

    #[test]
    fn test_empty_table_width() {
        assert_eq!(RawTable::default().width(), 0);
    }
}
