//! Binding of record fields to sheet columns.

use crate::mapping::field::ColumnMapping;
use crate::mapping::field::Field;
use crate::mapping::field::RecordMapping;
use crate::mapping::store::CellStore;
use crate::mapping::MappingError;
use tracing::trace;
use tracing::warn;

/// A field together with the column that supplies its value.
#[derive(Clone, Debug)]
pub struct ColumnBinding<T> {
    field: Field<T>,
    column: usize,
}

impl<T> ColumnBinding<T> {
    pub fn field(&self) -> &Field<T> {
        &self.field
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

/// How the fields of a record type are bound, chosen once per mapping call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Fields with a column name are looked up in the header row
    HeaderNames,
    /// Fields with a column index use that position
    Indexes,
    /// Every field is looked up in the header row by its own name
    FieldNames,
    /// Nothing can be bound; the mapping yields no records
    Unmapped,
}

impl Strategy {
    /// Picks the strategy for `mapping`.
    ///
    /// Column names win over indexes, which in turn only apply without a header row.
    pub fn select<T>(mapping: &RecordMapping<T>, include_header: bool) -> Self {
        if include_header && mapping.has_by_name() {
            Strategy::HeaderNames
        } else if !include_header && mapping.has_by_index() {
            Strategy::Indexes
        } else if include_header {
            Strategy::FieldNames
        } else {
            Strategy::Unmapped
        }
    }
}

/// Binds the fields of `mapping` to columns of `store`.
///
/// # Arguments
///
/// * `strategy` - Strategy returned by [`Strategy::select`]
/// * `store` - Cells of the sheet, header in row 0 when one is present
/// * `mapping` - Field descriptors of the record type
/// * `ignore_case` - Global case rule for header names
///
/// # Returns
///
/// One binding per bound field, in declaration order. Fails on the first name that
/// does not match exactly one header cell.
pub fn resolve<T>(
    strategy: Strategy,
    store: &CellStore,
    mapping: &RecordMapping<T>,
    ignore_case: bool,
) -> Result<Vec<ColumnBinding<T>>, MappingError> {
    let mut bindings = Vec::new();
    for field in mapping.fields() {
        let column = match (strategy, field.mapping()) {
            (Strategy::HeaderNames, ColumnMapping::ByName(name)) => {
                header_column(store, name, field.case_rule().unwrap_or(ignore_case))?
            }
            (Strategy::Indexes, ColumnMapping::ByIndex(index)) => *index,
            (Strategy::FieldNames, _) => header_column(store, field.name(), ignore_case)?,
            _ => continue,
        };
        trace!(field = field.name(), column, ?strategy, "field bound");
        bindings.push(ColumnBinding {
            field: field.clone(),
            column,
        });
    }
    Ok(bindings)
}

fn header_column(store: &CellStore, name: &str, ignore_case: bool) -> Result<usize, MappingError> {
    match store.header_columns(name, ignore_case).as_slice() {
        [column] => Ok(*column),
        [] => Err(MappingError::NoMatchedColumnName(name.to_owned())),
        columns => {
            warn!(name, ?columns, ignore_case, "column name matches several header cells");
            Err(MappingError::NoMatchedColumnName(name.to_owned()))
        }
    }
}
