//! # Mapping Engine Core
//!
//! Turns the raw triples of one sheet into typed records:
//!
//! 1. [`store::CellStore`] indexes the triples by coordinate.
//! 2. [`field::RecordMapping`] describes, per field of the record type, which column
//!    feeds it (by header name, by position, or by the field's own name) and how
//!    its text is pre-processed.
//! 3. [`resolver`] binds every described field to a column index.
//! 4. [`records::Records`] walks the data rows lazily, coercing cell text through
//!    [`value::FromCell`].
use thiserror::Error;

pub mod field;
pub mod records;
pub mod resolver;
pub mod store;
pub mod value;

pub use field::ColumnMapping;
pub use field::ColumnParser;
pub use field::Field;
pub use field::RecordMapping;
pub use field::SheetRecord;
pub use records::Records;
pub use resolver::ColumnBinding;
pub use resolver::Strategy;
pub use store::CellStore;
pub use value::FromCell;

/// Errors raised while mapping a sheet to records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A required option was never set
    #[error("The {0} option of MappingOptions is required.")]
    ConfigurationRequired(&'static str),

    /// A name could not be matched to exactly one header cell
    #[error("Can not find matched column name:[{0}] in the excel header.")]
    NoMatchedColumnName(String),

    /// Cell text could not be converted to the field's declared type
    #[error("Invalid cell value '{value}' at '{reference}' for field '{field}' of type {type_name}: {message}")]
    CoercionFailure {
        reference: String,
        field: String,
        type_name: &'static str,
        value: String,
        message: String,
    },
}
