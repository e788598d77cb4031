//! Declarative description of how a record type is filled from sheet columns.

use crate::mapping::value::FromCell;
use std::fmt;
use std::sync::Arc;

/// Transformation applied to a cell's raw text before type coercion.
pub type ColumnParser = Arc<dyn Fn(&str) -> String + Send + Sync>;

type Assign<T> = Arc<dyn Fn(&mut T, Option<&str>) -> Result<(), String> + Send + Sync>;

/// Where a field takes its value from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnMapping {
    /// The header cell with this text
    ByName(String),
    /// The column at this 0-based position
    ByIndex(usize),
    /// The header cell named like the field itself
    Implicit,
}

/// One mappable field of a record type `T`.
pub struct Field<T> {
    name: String,
    type_name: &'static str,
    mapping: ColumnMapping,
    ignore_case: Option<bool>,
    parser: Option<ColumnParser>,
    assign: Assign<T>,
}

impl<T: 'static> Field<T> {
    /// Declares a field called `name` whose value of type `V` is stored by `setter`.
    ///
    /// Without further markers the field is implicit: it is matched against the
    /// header by `name`.
    ///
    /// # Example
    ///
    /// ```
    /// use sheet_mapper::mapping::Field;
    ///
    /// #[derive(Default)]
    /// struct Order {
    ///     price: Option<f64>,
    /// }
    ///
    /// let price = Field::new("Price", |order: &mut Order, value| order.price = value)
    ///     .column_name("價格");
    /// assert_eq!(price.name(), "Price");
    /// ```
    pub fn new<V, F>(name: &str, setter: F) -> Self
    where
        V: FromCell + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            name: name.to_owned(),
            type_name: std::any::type_name::<V>(),
            mapping: ColumnMapping::Implicit,
            ignore_case: None,
            parser: None,
            assign: Arc::new(move |record: &mut T, text: Option<&str>| {
                setter(record, V::from_cell(text)?);
                Ok(())
            }),
        }
    }
}

impl<T> Field<T> {
    /// Maps the field to the header cell with text `column_name`.
    pub fn column_name(mut self, column_name: &str) -> Self {
        self.mapping = ColumnMapping::ByName(column_name.to_owned());
        self
    }

    /// Compares the column name case-insensitively, whatever the global setting.
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = Some(true);
        self
    }

    /// Compares the column name case-sensitively, whatever the global setting.
    pub fn match_case(mut self) -> Self {
        self.ignore_case = Some(false);
        self
    }

    /// Maps the field to a column position, used when the sheet has no header row.
    ///
    /// A column name declared on the same field takes precedence.
    pub fn column_index(mut self, column_index: usize) -> Self {
        if !matches!(self.mapping, ColumnMapping::ByName(_)) {
            self.mapping = ColumnMapping::ByIndex(column_index);
        }
        self
    }

    /// Runs `parser` on the raw cell text before it is coerced.
    pub fn parser<P>(mut self, parser: P) -> Self
    where
        P: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type, as reported by [`std::any::type_name`].
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Field-level case rule, `None` when the global option applies.
    pub fn case_rule(&self) -> Option<bool> {
        self.ignore_case
    }

    pub fn has_parser(&self) -> bool {
        self.parser.is_some()
    }

    /// Stores the value of `text` into `record`.
    ///
    /// The custom parser, if any, sees an absent cell as empty text.
    pub(crate) fn assign(&self, record: &mut T, text: Option<&str>) -> Result<(), String> {
        match &self.parser {
            Some(parser) => {
                let parsed = parser(text.unwrap_or_default());
                (self.assign)(record, Some(&parsed))
            }
            None => (self.assign)(record, text),
        }
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            type_name: self.type_name,
            mapping: self.mapping.clone(),
            ignore_case: self.ignore_case,
            parser: self.parser.clone(),
            assign: Arc::clone(&self.assign),
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("mapping", &self.mapping)
            .field("ignore_case", &self.ignore_case)
            .field("parser", &self.parser.is_some())
            .finish()
    }
}

/// Ordered field descriptors of a record type.
pub struct RecordMapping<T> {
    fields: Vec<Field<T>>,
}

impl<T> RecordMapping<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field.
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Whether any field declares a column name.
    pub fn has_by_name(&self) -> bool {
        self.fields
            .iter()
            .any(|field| matches!(field.mapping, ColumnMapping::ByName(_)))
    }

    /// Whether any field declares a column index.
    pub fn has_by_index(&self) -> bool {
        self.fields
            .iter()
            .any(|field| matches!(field.mapping, ColumnMapping::ByIndex(_)))
    }
}

impl<T> Default for RecordMapping<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordMapping<T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<T> fmt::Debug for RecordMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

/// A record type that can be produced from sheet rows.
///
/// Each row starts from `Self::default()`; fields left unbound keep their default.
pub trait SheetRecord: Default {
    fn mapping() -> RecordMapping<Self>;
}
