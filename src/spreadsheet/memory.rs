//! In-memory adapter: sheets of triples registered under a name.
//!
//! Useful when the cells come from somewhere other than a workbook file, and for
//! exercising the mapping engine without building packages.

use crate::error::SheetMapperError;
use crate::options::Source;
use crate::spreadsheet::CellTriple;
use crate::spreadsheet::Sheet;
use crate::spreadsheet::SheetAdapter;
use crate::spreadsheet::SheetMeta;
use crate::spreadsheet::SpreadsheetError;
use std::collections::HashMap;

/// A workbook held entirely in memory.
///
/// The source handle passed to [`SheetAdapter::open_sheet`] is only used for error
/// messages; sheets are looked up by name.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorkbook {
    sheets: HashMap<String, Vec<CellTriple>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a sheet.
    pub fn with_sheet<I, C>(mut self, name: &str, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellTriple>,
    {
        self.sheets
            .insert(name.to_owned(), cells.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a sheet from rows of text, `None` marking an empty cell.
    pub fn with_rows(self, name: &str, rows: &[&[Option<&str>]]) -> Self {
        let mut cells = Vec::new();
        for (row, values) in rows.iter().enumerate() {
            for (column, value) in values.iter().enumerate() {
                cells.push(match value {
                    Some(text) => CellTriple::new(row, column, *text),
                    None => CellTriple::empty(row, column),
                });
            }
        }
        self.with_sheet(name, cells)
    }
}

/// A sheet of a [`MemoryWorkbook`].
#[derive(Clone, Debug)]
pub struct MemorySheet {
    cells: Vec<CellTriple>,
    meta: SheetMeta,
}

impl Sheet for MemorySheet {
    fn meta(&self) -> SheetMeta {
        self.meta
    }

    fn parse_contents(&mut self) -> Result<Vec<CellTriple>, SheetMapperError> {
        let mut cells = std::mem::take(&mut self.cells);
        cells.sort_by_key(|cell| (cell.row, cell.column));
        Ok(cells)
    }
}

impl SheetAdapter for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn open_sheet(
        &self,
        source: &Source,
        sheet_name: &str,
        _editable: bool,
    ) -> Result<MemorySheet, SheetMapperError> {
        let cells = self
            .sheets
            .get(sheet_name)
            .cloned()
            .ok_or_else(|| SpreadsheetError::SheetNotFound(source.name(), sheet_name.to_owned()))?;
        let meta = SheetMeta::covering(&cells);
        Ok(MemorySheet { cells, meta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_sheet_by_name() {
        let workbook = MemoryWorkbook::new().with_sheet("Sheet1", [(1usize, 0usize, "1"), (0, 0, "Num")]);
        let source = Source::from("stub.xlsx");
        let mut sheet = workbook.open_sheet(&source, "Sheet1", false).unwrap();

        assert_eq!(
            sheet.meta(),
            SheetMeta {
                row_count: 2,
                column_count: 1
            }
        );
        assert_eq!(
            sheet.parse_contents().unwrap(),
            vec![CellTriple::new(0, 0, "Num"), CellTriple::new(1, 0, "1")]
        );
    }

    #[test]
    fn missing_sheet() {
        let workbook = MemoryWorkbook::new().with_rows("Sheet1", &[&[Some("Id")]]);
        let error = workbook
            .open_sheet(&Source::from("stub.xlsx"), "Orders", false)
            .err()
            .unwrap();
        assert_eq!(error.to_string(), "Sheet 'Orders' not found in 'stub.xlsx'");
    }

    #[test]
    fn rows_keep_empty_cells() {
        let workbook = MemoryWorkbook::new().with_rows("S", &[&[Some("a"), None], &[None, Some("b")]]);
        let mut sheet = workbook.open_sheet(&Source::from("m"), "S", false).unwrap();
        assert_eq!(
            sheet.parse_contents().unwrap(),
            vec![
                CellTriple::new(0, 0, "a"),
                CellTriple::empty(0, 1),
                CellTriple::empty(1, 0),
                CellTriple::new(1, 1, "b"),
            ]
        );
    }
}
