//! # Sheet Mapper
//!
//! Maps the rows of a spreadsheet to strongly-typed records using declarative,
//! per-field column rules instead of hand-written parsing code.
//!
//! ## Features
//!
//! - **Three ways to find a column**: by header text, by position, or implicitly by
//!   the field's own name
//! - **Case rules**: global or per field header matching, with Unicode case folding
//! - **Custom parsers**: a per-field text transformation run before coercion
//! - **Typed values**: numbers, booleans, characters, chrono dates and times, and
//!   `Option` of each for nullable cells
//! - **Lazy records**: columns are resolved up front, rows are converted on demand
//! - **Pluggable adapters**: `.xlsx` workbooks out of the box, sheets in memory, or
//!   any format implementing [`spreadsheet::SheetAdapter`]
//!
//! ## Logging
//!
//! The crate emits `tracing` events and installs no subscriber; enable the
//! `sheet_mapper` target in the application's subscriber to see them.
mod error;
mod helpers;
pub mod mapping;
pub mod options;
pub mod reader;
pub mod spreadsheet;

pub use error::SheetMapperError;
pub use mapping::Field;
pub use mapping::FromCell;
pub use mapping::MappingError;
pub use mapping::RecordMapping;
pub use mapping::Records;
pub use mapping::SheetRecord;
pub use options::MappingOptions;
pub use options::Source;
pub use reader::SheetReader;
