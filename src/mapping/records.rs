//! Lazy materialization of records from bound columns.

use crate::error::SheetMapperError;
use crate::mapping::resolver::ColumnBinding;
use crate::mapping::store::CellStore;
use crate::mapping::MappingError;
use crate::spreadsheet::index_to_reference;
use std::iter::FusedIterator;

/// Records of one mapping call, produced one row per pull.
///
/// A row whose text cannot be coerced yields an `Err`, after which the sequence is
/// exhausted.
#[derive(Debug)]
pub struct Records<T> {
    store: CellStore,
    bindings: Vec<ColumnBinding<T>>,
    next_row: usize,
    row_count: usize,
    finished: bool,
}

impl<T: Default> Records<T> {
    pub(crate) fn new(store: CellStore, bindings: Vec<ColumnBinding<T>>, start_row: usize) -> Self {
        let row_count = store.row_count();
        Self {
            store,
            bindings,
            next_row: start_row,
            row_count,
            finished: false,
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            store: CellStore::default(),
            bindings: Vec::new(),
            next_row: 0,
            row_count: 0,
            finished: true,
        }
    }

    fn materialize(&self, row: usize) -> Result<T, MappingError> {
        let mut record = T::default();
        for binding in &self.bindings {
            let text = self.store.text(row, binding.column());
            let field = binding.field();
            field
                .assign(&mut record, text)
                .map_err(|message| MappingError::CoercionFailure {
                    reference: index_to_reference(row, binding.column()),
                    field: field.name().to_owned(),
                    type_name: field.type_name(),
                    value: text.unwrap_or_default().to_owned(),
                    message,
                })?;
        }
        Ok(record)
    }
}

impl<T: Default> Iterator for Records<T> {
    type Item = Result<T, SheetMapperError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.next_row >= self.row_count {
            self.finished = true;
            return None;
        }
        let row = self.next_row;
        self.next_row += 1;
        match self.materialize(row) {
            Ok(record) => Some(Ok(record)),
            Err(error) => {
                self.finished = true;
                Some(Err(error.into()))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            let remaining = self.row_count.saturating_sub(self.next_row);
            (remaining.min(1), Some(remaining))
        }
    }
}

impl<T: Default> FusedIterator for Records<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::field::Field;
    use crate::mapping::field::RecordMapping;
    use crate::mapping::resolver::resolve;
    use crate::mapping::resolver::Strategy;
    use crate::spreadsheet::CellTriple;
    use crate::spreadsheet::SheetMeta;

    #[derive(Debug, Default, PartialEq)]
    struct Row {
        id: i32,
        price: Option<f64>,
    }

    fn records(rows: &[&[Option<&str>]]) -> Records<Row> {
        let mut triples = Vec::new();
        for (row, values) in rows.iter().enumerate() {
            for (column, value) in values.iter().enumerate() {
                triples.push(match value {
                    Some(text) => CellTriple::new(row, column, *text),
                    None => CellTriple::empty(row, column),
                });
            }
        }
        let store = CellStore::new(SheetMeta::default(), triples);
        let mapping = RecordMapping::new()
            .field(Field::new("Id", |row: &mut Row, value| row.id = value))
            .field(Field::new("Price", |row: &mut Row, value| row.price = value));
        let bindings = resolve(Strategy::FieldNames, &store, &mapping, false).unwrap();
        Records::new(store, bindings, 1)
    }

    #[test]
    fn rows_after_header() {
        let records = records(&[
            &[Some("Id"), Some("Price")],
            &[Some("1"), Some("9.5")],
            &[Some("2"), None],
        ]);
        assert_eq!(records.size_hint(), (1, Some(2)));
        let rows: Vec<Row> = records.map(Result::unwrap).collect();
        assert_eq!(
            rows,
            vec![
                Row {
                    id: 1,
                    price: Some(9.5)
                },
                Row { id: 2, price: None },
            ]
        );
    }

    #[test]
    fn header_only_yields_nothing() {
        let mut records = records(&[&[Some("Id"), Some("Price")]]);
        assert!(records.next().is_none());
    }

    #[test]
    fn coercion_failure_ends_sequence() {
        let mut records = records(&[
            &[Some("Id"), Some("Price")],
            &[Some("1"), None],
            &[Some("x"), None],
            &[Some("3"), None],
        ]);
        assert!(records.next().unwrap().is_ok());
        let error = records.next().unwrap().unwrap_err();
        assert_eq!(
            error.as_mapping_error(),
            Some(&MappingError::CoercionFailure {
                reference: "A3".to_owned(),
                field: "Id".to_owned(),
                type_name: "i32",
                value: "x".to_owned(),
                message: "parse 'x' to i32 failed".to_owned(),
            })
        );
        assert!(records.next().is_none());
        assert_eq!(records.size_hint(), (0, Some(0)));
    }

    #[test]
    fn empty_sequence() {
        let mut records = Records::<Row>::empty();
        assert!(records.next().is_none());
    }
}
