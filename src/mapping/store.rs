//! Indexed cell contents of one sheet.

use crate::spreadsheet::CellTriple;
use crate::spreadsheet::SheetMeta;
use std::collections::HashMap;
use tracing::trace;

/// Raw cell texts of a sheet, addressable by (row, column).
#[derive(Clone, Debug, Default)]
pub struct CellStore {
    cells: HashMap<(usize, usize), Option<String>>,
    row_count: usize,
    column_count: usize,
}

impl CellStore {
    /// Indexes the triples an adapter produced for a sheet.
    ///
    /// The dimensions are the larger of `meta` and the range the triples cover.
    /// A coordinate given twice keeps its last text.
    pub fn new(meta: SheetMeta, triples: Vec<CellTriple>) -> Self {
        let covering = SheetMeta::covering(&triples);
        let mut cells = HashMap::with_capacity(triples.len());
        for triple in triples {
            if let Some(previous) = cells.insert((triple.row, triple.column), triple.text) {
                trace!(
                    row = triple.row,
                    column = triple.column,
                    ?previous,
                    "duplicate cell triple replaced"
                );
            }
        }
        Self {
            cells,
            row_count: meta.row_count.max(covering.row_count),
            column_count: meta.column_count.max(covering.column_count),
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Text at the given coordinate, `None` when the cell is absent or empty.
    pub fn text(&self, row: usize, column: usize) -> Option<&str> {
        self.cells.get(&(row, column)).and_then(|text| text.as_deref())
    }

    /// Columns of row 0 whose text equals `name`, in column order.
    pub fn header_columns(&self, name: &str, ignore_case: bool) -> Vec<usize> {
        let folded = ignore_case.then(|| name.to_lowercase());
        (0..self.column_count)
            .filter(|column| match (self.text(0, *column), &folded) {
                (Some(text), Some(folded)) => text.to_lowercase() == *folded,
                (Some(text), None) => text == name,
                (None, _) => false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CellStore {
        let triples = vec![
            CellTriple::new(0, 0, "Id"),
            CellTriple::new(0, 1, "NUMBER"),
            CellTriple::empty(0, 2),
            CellTriple::new(0, 3, "number"),
            CellTriple::new(1, 0, "7"),
        ];
        CellStore::new(
            SheetMeta {
                row_count: 3,
                column_count: 4,
            },
            triples,
        )
    }

    #[test]
    fn lookup_by_coordinate() {
        let store = store();
        assert_eq!(store.text(1, 0), Some("7"));
        assert_eq!(store.text(0, 2), None);
        assert_eq!(store.text(5, 5), None);
        assert_eq!(store.row_count(), 3);
        assert_eq!(store.column_count(), 4);
    }

    #[test]
    fn header_match_respects_case_policy() {
        let store = store();
        assert_eq!(store.header_columns("Id", false), vec![0]);
        assert_eq!(store.header_columns("id", false), Vec::<usize>::new());
        assert_eq!(store.header_columns("id", true), vec![0]);
        assert_eq!(store.header_columns("number", false), vec![3]);
        assert_eq!(store.header_columns("Number", true), vec![1, 3]);
    }

    #[test]
    fn dimensions_grow_to_cover_triples() {
        let store = CellStore::new(SheetMeta::default(), vec![CellTriple::new(4, 2, "x")]);
        assert_eq!(store.row_count(), 5);
        assert_eq!(store.column_count(), 3);
    }

    #[test]
    fn duplicate_coordinate_keeps_last() {
        let store = CellStore::new(
            SheetMeta::default(),
            vec![CellTriple::new(0, 0, "first"), CellTriple::new(0, 0, "second")],
        );
        assert_eq!(store.text(0, 0), Some("second"));
    }
}
