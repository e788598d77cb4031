//! # Sheet Reader
//!
//! Fluent entry point that maps one sheet of a workbook to typed records.
//!
//! ```no_run
//! use sheet_mapper::mapping::Field;
//! use sheet_mapper::mapping::RecordMapping;
//! use sheet_mapper::mapping::SheetRecord;
//! use sheet_mapper::SheetReader;
//!
//! #[derive(Debug, Default)]
//! struct Order {
//!     number: String,
//!     quantity: Option<u32>,
//! }
//!
//! impl SheetRecord for Order {
//!     fn mapping() -> RecordMapping<Self> {
//!         RecordMapping::new()
//!             .field(Field::new("Number", |o: &mut Order, v| o.number = v).column_name("No."))
//!             .field(Field::new("Quantity", |o: &mut Order, v| o.quantity = v))
//!     }
//! }
//!
//! # fn main() -> Result<(), sheet_mapper::SheetMapperError> {
//! let reader = SheetReader::new().open("orders.xlsx").sheet_as("Orders").include_header(true);
//! for order in reader.map_to::<Order>()? {
//!     println!("{:?}", order?);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::SheetMapperError;
use crate::mapping::resolver::resolve;
use crate::mapping::CellStore;
use crate::mapping::RecordMapping;
use crate::mapping::Records;
use crate::mapping::SheetRecord;
use crate::mapping::Strategy;
use crate::options::MappingOptions;
use crate::options::Source;
use crate::spreadsheet::Sheet;
use crate::spreadsheet::SheetAdapter;
use crate::spreadsheet::XlsxAdapter;
use tracing::debug;

/// Maps sheets to records with a configured adapter.
///
/// Every configuration method consumes the reader and returns the updated one;
/// [`SheetReader::map_to`] only borrows it, so a configured reader can map any
/// number of times.
#[derive(Clone, Debug, Default)]
pub struct SheetReader<A = XlsxAdapter> {
    options: MappingOptions,
    adapter: A,
}

impl SheetReader<XlsxAdapter> {
    /// Reader for `.xlsx` workbooks with default options.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: SheetAdapter> SheetReader<A> {
    /// Replaces the adapter, keeping the options.
    pub fn with_adapter<B: SheetAdapter>(self, adapter: B) -> SheetReader<B> {
        SheetReader {
            options: self.options,
            adapter,
        }
    }

    /// Sets the workbook to read.
    pub fn open(mut self, source: impl Into<Source>) -> Self {
        self.options.source = Some(source.into());
        self
    }

    /// Sets the sheet to read.
    pub fn sheet_as(mut self, sheet_name: &str) -> Self {
        self.options.sheet_name = Some(sheet_name.to_owned());
        self
    }

    /// Whether row 0 holds column names.
    pub fn include_header(mut self, include_header: bool) -> Self {
        self.options.include_header = include_header;
        self
    }

    pub fn exclude_header(self) -> Self {
        self.include_header(false)
    }

    /// Global case rule for header names.
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.options.ignore_case = ignore_case;
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.options.editable = editable;
        self
    }

    /// Replaces all options at once.
    pub fn with_options(mut self, options: MappingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Maps the configured sheet to records of `T`, using [`SheetRecord::mapping`].
    pub fn map_to<T: SheetRecord>(&self) -> Result<Records<T>, SheetMapperError> {
        self.map_with(&T::mapping())
    }

    /// Maps the configured sheet to records of `T` described by `mapping`.
    ///
    /// The sheet is loaded and columns are resolved before this returns; records
    /// themselves are produced as the returned iterator is pulled.
    ///
    /// # Returns
    ///
    /// * `ConfigurationRequired` when the source or the sheet name is missing
    /// * `NoMatchedColumnName` when a column name is absent or ambiguous in the header
    /// * any error of the adapter while opening or reading the sheet
    pub fn map_with<T: Default>(&self, mapping: &RecordMapping<T>) -> Result<Records<T>, SheetMapperError> {
        let (source, sheet_name) = self.options.required()?;

        let store = self.load(source, sheet_name)?;
        let strategy = Strategy::select(mapping, self.options.include_header);
        debug!(
            sheet = sheet_name,
            rows = store.row_count(),
            columns = store.column_count(),
            ?strategy,
            "sheet loaded"
        );
        if strategy == Strategy::Unmapped {
            return Ok(Records::empty());
        }

        let bindings = resolve(strategy, &store, mapping, self.options.ignore_case)?;
        let start_row = if self.options.include_header { 1 } else { 0 };
        Ok(Records::new(store, bindings, start_row))
    }

    /// Reads the sheet into a store; the adapter's handle is released on return.
    fn load(&self, source: &Source, sheet_name: &str) -> Result<CellStore, SheetMapperError> {
        let mut sheet = self
            .adapter
            .open_sheet(source, sheet_name, self.options.editable)?;
        let meta = sheet.meta();
        let triples = sheet.parse_contents()?;
        Ok(CellStore::new(meta, triples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Field;
    use crate::mapping::MappingError;
    use crate::spreadsheet::MemoryWorkbook;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq)]
    struct Num {
        id: i32,
        number: String,
    }

    impl SheetRecord for Num {
        fn mapping() -> RecordMapping<Self> {
            RecordMapping::new()
                .field(Field::new("Id", |num: &mut Num, value| num.id = value))
                .field(Field::new("Number", |num: &mut Num, value| num.number = value))
        }
    }

    fn num(id: i32, number: &str) -> Num {
        Num {
            id,
            number: number.to_owned(),
        }
    }

    fn reader(rows: &[&[Option<&str>]]) -> SheetReader<MemoryWorkbook> {
        SheetReader::new()
            .with_adapter(MemoryWorkbook::new().with_rows("Sheet1", rows))
            .open("memory.xlsx")
            .sheet_as("Sheet1")
    }

    fn collect<T>(records: Records<T>) -> Vec<T>
    where
        T: Default,
    {
        records.collect::<Result<Vec<_>, _>>().unwrap()
    }

    const NUMS: &[&[Option<&str>]] = &[
        &[Some("Id"), Some("Number")],
        &[Some("1"), Some("A-1")],
        &[Some("2"), Some("A-2")],
    ];

    #[test]
    fn implicit_names_with_header() {
        let records = reader(NUMS).include_header(true).map_to::<Num>().unwrap();
        assert_eq!(collect(records), vec![num(1, "A-1"), num(2, "A-2")]);
    }

    #[test]
    fn mapping_twice_gives_same_records() {
        let reader = reader(NUMS).include_header(true);
        let first = collect(reader.map_to::<Num>().unwrap());
        let second = collect(reader.map_to::<Num>().unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn required_options_checked_first() {
        let error = SheetReader::new().map_to::<Num>().unwrap_err();
        assert_eq!(
            error.as_mapping_error(),
            Some(&MappingError::ConfigurationRequired("source"))
        );

        let error = SheetReader::new().open("orders.xlsx").map_to::<Num>().unwrap_err();
        assert_eq!(error.to_string(), "The sheet_name option of MappingOptions is required.");

        let error = reader(NUMS).sheet_as("").map_to::<Num>().unwrap_err();
        assert_eq!(
            error.as_mapping_error(),
            Some(&MappingError::ConfigurationRequired("sheet_name"))
        );
    }

    #[test]
    fn column_names_with_ignore_case() {
        let mapping = RecordMapping::new()
            .field(Field::new("Id", |num: &mut Num, value| num.id = value).column_name("ID"))
            .field(Field::new("Number", |num: &mut Num, value| num.number = value).column_name("NUMBER"));
        let records = reader(NUMS)
            .include_header(true)
            .ignore_case(true)
            .map_with(&mapping)
            .unwrap();
        assert_eq!(collect(records), vec![num(1, "A-1"), num(2, "A-2")]);
    }

    #[test]
    fn unmatched_column_name_fails_before_any_record() {
        let mapping = RecordMapping::new()
            .field(Field::new("Number", |num: &mut Num, value| num.number = value).column_name("Num"));
        let error = reader(NUMS).include_header(true).map_with(&mapping).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Can not find matched column name:[Num] in the excel header."
        );
    }

    #[test]
    fn unnamed_fields_keep_defaults_when_names_are_used() {
        let mapping = RecordMapping::new()
            .field(Field::new("Id", |num: &mut Num, value| num.id = value))
            .field(Field::new("Number", |num: &mut Num, value| num.number = value).column_name("Number"));
        let records = reader(NUMS).include_header(true).map_with(&mapping).unwrap();
        assert_eq!(collect(records), vec![num(0, "A-1"), num(0, "A-2")]);
    }

    #[test]
    fn indexes_without_header_read_row_zero() {
        let mapping = RecordMapping::new()
            .field(Field::new("Id", |num: &mut Num, value| num.id = value).column_index(1))
            .field(Field::new("Number", |num: &mut Num, value| num.number = value).column_index(0));
        let records = reader(&[&[Some("A-7"), Some("7")], &[Some("A-8"), Some("8")]])
            .exclude_header()
            .map_with(&mapping)
            .unwrap();
        assert_eq!(collect(records), vec![num(7, "A-7"), num(8, "A-8")]);
    }

    #[test]
    fn no_header_and_no_index_yields_nothing() {
        let records = reader(NUMS).map_to::<Num>().unwrap();
        assert_eq!(collect(records), Vec::<Num>::new());
    }

    #[test]
    fn parser_strips_before_coercion() {
        let mapping = RecordMapping::new()
            .field(Field::new("Id", |num: &mut Num, value| num.id = value).parser(|text| text.replace('#', "")));
        let records = reader(&[&[Some("Id")], &[Some("#12")], &[Some("3#")]])
            .include_header(true)
            .map_with(&mapping)
            .unwrap();
        assert_eq!(collect(records), vec![num(12, ""), num(3, "")]);
    }

    #[test]
    fn nullable_fields_accept_empty_cells() {
        #[derive(Debug, Default, PartialEq)]
        struct Price {
            value: Option<f64>,
        }
        let mapping = RecordMapping::new()
            .field(Field::new("Price", |price: &mut Price, value| price.value = value));
        let records = reader(&[&[Some("Price")], &[Some("2.5")], &[None], &[Some(" ")]])
            .include_header(true)
            .map_with(&mapping)
            .unwrap();
        assert_eq!(
            collect(records),
            vec![
                Price { value: Some(2.5) },
                Price { value: None },
                Price { value: None }
            ]
        );
    }

    #[test]
    fn empty_cell_in_required_field_fails_on_pull() {
        let mut records = reader(&[&[Some("Id"), Some("Number")], &[None, Some("A-1")]])
            .include_header(true)
            .map_to::<Num>()
            .unwrap();
        let error = records.next().unwrap().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid cell value '' at 'A2' for field 'Id' of type i32: empty cell"
        );
        assert!(records.next().is_none());
    }

    #[test]
    fn missing_sheet_reports_adapter_error() {
        let error = reader(NUMS).sheet_as("Orders").map_to::<Num>().unwrap_err();
        assert_eq!(error.to_string(), "Sheet 'Orders' not found in 'memory.xlsx'");
    }

    #[test]
    fn options_round_trip() {
        let options = MappingOptions {
            source: Some(Source::from("a.xlsx")),
            sheet_name: Some("S".to_owned()),
            include_header: true,
            ignore_case: true,
            editable: false,
        };
        let reader = SheetReader::new().with_options(options);
        assert!(reader.options().include_header);
        assert_eq!(reader.options().sheet_name.as_deref(), Some("S"));
    }
}
