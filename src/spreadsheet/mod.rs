//! # Spreadsheet Adapters
//!
//! The boundary between workbook files and the mapping engine. An adapter opens one
//! sheet of a workbook and hands its used range back as raw `(row, column, text)`
//! triples; the engine never sees the file format behind them.
//!
//! Two adapters ship with the crate:
//!
//! - [`XlsxAdapter`]: Office Open XML workbooks (`.xlsx`, `.xlsm`)
//! - [`MemoryWorkbook`]: sheets assembled from triples already in memory
use crate::error::SheetMapperError;
use crate::options::Source;
use thiserror::Error;

pub(crate) mod cell;
pub(crate) mod excel;
pub mod memory;
pub(crate) mod reference;
pub mod xlsx;

pub use memory::MemoryWorkbook;
pub use reference::index_to_reference;
pub use xlsx::XlsxAdapter;

/// Errors raised while opening a workbook or reading one of its sheets.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// A part the workbook format requires is missing
    #[error("Missing workbook part '{0}'")]
    FileError(String),

    /// The workbook declares no sheets at all
    #[error("Spreadsheet '{0}' contains no sheets")]
    SpreadsheetEmptyError(String),

    /// The requested sheet is not declared by the workbook
    #[error("Sheet '{1}' not found in '{0}'")]
    SheetNotFound(String, String),

    /// A stored value does not match the type its cell declares
    #[error("Invalid cell value at '{0}': {1}")]
    CellValueError(String, String),
}

/// One unit of raw tabular content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellTriple {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub column: usize,
    /// Cell text, `None` for an empty cell
    pub text: Option<String>,
}

impl CellTriple {
    pub fn new(row: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            row,
            column,
            text: Some(text.into()),
        }
    }

    pub fn empty(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            text: None,
        }
    }
}

impl From<(usize, usize, &str)> for CellTriple {
    fn from((row, column, text): (usize, usize, &str)) -> Self {
        CellTriple::new(row, column, text)
    }
}

/// Size of a sheet's used range, counted from A1.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetMeta {
    pub row_count: usize,
    pub column_count: usize,
}

impl SheetMeta {
    /// Smallest range starting at A1 that covers every triple.
    pub fn covering(triples: &[CellTriple]) -> Self {
        triples.iter().fold(SheetMeta::default(), |meta, triple| SheetMeta {
            row_count: meta.row_count.max(triple.row + 1),
            column_count: meta.column_count.max(triple.column + 1),
        })
    }
}

/// A sheet opened by an adapter.
///
/// The value owns whatever handle the adapter needs to read the sheet; dropping it
/// releases that handle.
pub trait Sheet {
    /// Size of the sheet's used range.
    fn meta(&self) -> SheetMeta;

    /// Cells of the used range, row-major and 0-based.
    ///
    /// Cells left out are read as empty; [`Sheet::meta`] gives the range.
    fn parse_contents(&mut self) -> Result<Vec<CellTriple>, SheetMapperError>;
}

/// Opens sheets of workbooks for the mapping engine.
pub trait SheetAdapter {
    type Sheet: Sheet;

    /// Opens `sheet_name` in the workbook behind `source`.
    fn open_sheet(
        &self,
        source: &Source,
        sheet_name: &str,
        editable: bool,
    ) -> Result<Self::Sheet, SheetMapperError>;
}
