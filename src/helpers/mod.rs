//! Low level helpers shared by the workbook adapters

pub(crate) mod reader;
pub mod xml;
pub(crate) mod zip;
