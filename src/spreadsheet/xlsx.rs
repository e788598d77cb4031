use crate::error::ResultMessage;
use crate::error::SheetMapperError;
use crate::helpers::reader::SourceReader;
use crate::helpers::xml::attribute_value;
use crate::helpers::xml::push_reference;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::options::Source;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::excel;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::CellTriple;
use crate::spreadsheet::Sheet;
use crate::spreadsheet::SheetAdapter;
use crate::spreadsheet::SheetMeta;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::HashSet;
use std::io::BufRead;
use tracing::debug;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts"); // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");   // Individual custom number format
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");  // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");         // Individual cell format index
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr"); // Workbook properties
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

/// Adapter for Office Open XML workbooks (`.xlsx`, `.xlsm`).
#[derive(Copy, Clone, Debug, Default)]
pub struct XlsxAdapter;

impl SheetAdapter for XlsxAdapter {
    type Sheet = XlsxSheet;

    fn open_sheet(
        &self,
        source: &Source,
        sheet_name: &str,
        editable: bool,
    ) -> Result<XlsxSheet, SheetMapperError> {
        XlsxSheet::open(source, sheet_name, editable)
    }
}

/// One worksheet of an XLSX package.
///
/// Holds the open package until dropped: shared strings are read from it when the
/// contents are parsed.
pub struct XlsxSheet {
    /// Display name of the workbook
    file_name: String,
    /// Worksheet name
    sheet_name: String,
    /// ZIP archive containing the XLSX file contents
    zip: ZipArchive<SourceReader>,
    /// Non-empty cells of the worksheet, shared strings still unresolved
    cells: Vec<Cell>,
    meta: SheetMeta,
}

impl XlsxSheet {
    /// Opens an XLSX package, locates the worksheet by name and reads its cells
    ///
    /// # Arguments
    /// * `source` - Path or bytes of the XLSX file
    /// * `sheet_name` - Name of the worksheet as shown on its tab
    /// * `editable` - Write access request, the package is always opened read-only
    pub fn open(source: &Source, sheet_name: &str, editable: bool) -> Result<XlsxSheet, SheetMapperError> {
        let file_name = source.name();
        if editable {
            debug!(file = %file_name, "editable access requested, opening read-only");
        }

        let reader = SourceReader::new(source)?;
        let mut zip = ZipArchive::new(reader)?;
        let (sheets, is_1904) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(file_name.to_owned()))?
        }
        let zip_path = sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, path)| path.to_owned())
            .ok_or_else(|| SpreadsheetError::SheetNotFound(file_name.to_owned(), sheet_name.to_owned()))?;

        let number_formats = load_number_formats(&mut zip, is_1904)?;
        let cells = read_cells(&mut zip, &zip_path, &number_formats)
            .with_prefix(&format!("Read sheet '{sheet_name}' of '{file_name}' failed"))?;
        let meta = SheetMeta {
            row_count: cells.iter().map(|cell| cell.row + 1).max().unwrap_or(0),
            column_count: cells.iter().map(|cell| cell.col + 1).max().unwrap_or(0),
        };
        debug!(
            file = %file_name,
            sheet = sheet_name,
            rows = meta.row_count,
            columns = meta.column_count,
            "opened xlsx sheet"
        );

        Ok(XlsxSheet {
            file_name,
            sheet_name: sheet_name.to_owned(),
            zip,
            cells,
            meta,
        })
    }

    /// Loads the shared strings referenced by the given indexes
    ///
    /// # Returns
    /// Tuple of (shared_strings, mappings) where mappings maps shared string indexes to loaded positions
    fn load_shared_strings(
        &mut self,
        mut indexes: HashSet<usize>,
    ) -> Result<(Vec<String>, HashMap<usize, usize>), SheetMapperError> {
        let mut shared_strings = Vec::<String>::new();
        let mut mappings = HashMap::<usize, usize>::new();
        if indexes.is_empty() {
            return Ok((shared_strings, mappings));
        }
        let mut reader = self
            .zip
            .xml_reader("xl/sharedStrings.xml")?
            .ok_or_else(|| SpreadsheetError::FileError("xl/sharedStrings.xml".to_owned()))?;

        let mut id = 0usize;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                if indexes.remove(&id) {
                    let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                    mappings.insert(id, shared_strings.len());
                    shared_strings.push(string);
                    if indexes.is_empty() {
                        break;
                    }
                }
                id += 1;
            }
        });
        Ok((shared_strings, mappings))
    }
}

impl Sheet for XlsxSheet {
    fn meta(&self) -> SheetMeta {
        self.meta
    }

    /// Renders every stored cell to text, resolving shared strings. Gaps of the used
    /// range are left out.
    fn parse_contents(&mut self) -> Result<Vec<CellTriple>, SheetMapperError> {
        let mut indexes = HashSet::new();
        for cell in self.cells.iter().filter(|cell| cell.kind == CellType::SharedString) {
            indexes.insert(cell.value.trim().parse::<usize>()?);
        }
        let (shared_strings, mappings) = self.load_shared_strings(indexes)?;

        let mut triples = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            let text = if cell.kind == CellType::SharedString {
                let index = cell.value.trim().parse::<usize>()?;
                mappings
                    .get(&index)
                    .map(|position| shared_strings[*position].to_owned())
                    .ok_or_else(|| SpreadsheetError::CellValueError(cell.reference(), cell.value.to_owned()))?
            } else {
                cell.to_text()?
            };
            triples.push(CellTriple::new(cell.row, cell.col, text));
        }
        debug!(
            file = %self.file_name,
            sheet = %self.sheet_name,
            cells = triples.len(),
            shared_strings = shared_strings.len(),
            "parsed xlsx sheet contents"
        );
        Ok(triples)
    }
}

/// Reads the non-empty cells of a worksheet part
fn read_cells(
    zip: &mut ZipArchive<SourceReader>,
    zip_path: &str,
    number_formats: &[CellType],
) -> Result<Vec<Cell>, SheetMapperError> {
    let mut reader = zip
        .xml_reader(zip_path)?
        .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
    let mut cells = Vec::<Cell>::new();
    let mut next_row = 0usize;
    let mut row = 0usize;
    let mut col = 0usize;
    let mut col_count = 0usize;
    let mut kind = CellType::default();
    let mut value = String::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_ROW => {
            row = event.parse_attribute_value::<usize>("r")?
                .filter(|number| *number > 0)
                .map(|number| number - 1)
                .unwrap_or(next_row);
            col_count = 0;
        }
        Event::End(event) if event.name() == TAG_ROW => {
            next_row = row + 1;
        }
        Event::Start(event) if event.name() == TAG_CELL => {
            (row, col) = event.get_attribute_value("r")?
                .and_then(|reference| reference_to_index(&reference))
                .unwrap_or((row, col_count));
            col_count = col + 1;
            value.clear();
            kind = event.get_attribute_value("t")?.map(|t| {
                match t.as_ref() {
                    "inlineStr" | "str" => CellType::InlineString,
                    "s" => CellType::SharedString,
                    "d" => CellType::IsoDateTime,
                    "b" => CellType::Boolean,
                    "e" => CellType::Error,
                    _ => CellType::Number,
                }
            }).unwrap_or(CellType::Number);
            if kind == CellType::Number {
                if let Some(index) = event.parse_attribute_value::<usize>("s")? {
                    kind = number_formats.get(index).copied().unwrap_or(CellType::Number);
                }
            }
        }
        Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
            value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
        }
        Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
            value = read_string_value(&mut reader, TAG_VALUE, true)?;
        }
        Event::End(event) if event.name() == TAG_CELL => {
            if kind != CellType::Empty && !value.is_empty() {
                cells.push(Cell {
                    row,
                    col,
                    kind,
                    value: std::mem::take(&mut value),
                });
            }
            kind = CellType::Empty;
        }
    });
    Ok(cells)
}

/// Loads worksheet names and paths from the workbook part
///
/// # Returns
/// Tuple of (worksheets, is_1904_date_system) where worksheets are (name, zip_path) pairs
fn load_workbook(zip: &mut ZipArchive<SourceReader>) -> Result<(Vec<(String, String)>, bool), SheetMapperError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute_value(&attribute)?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute_value(&attribute)?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&*id) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value == "1" || value == "true")
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Loads number formats and cell styles from the styles part
///
/// # Returns
/// Vector of CellType values indexed by style ID
fn load_number_formats(zip: &mut ZipArchive<SourceReader>, is_1904: bool) -> Result<Vec<CellType>, SheetMapperError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
        Event::End(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
        Event::Start(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                custom_formats.insert(id.to_string(), CellType::parse_custom_number_format(&format, is_1904));
            }
        }
        Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = false,
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            let id = event.get_attribute_value("numFmtId")?;
            format_indexes.push(id.map(|id| id.to_string()).unwrap_or_else(|| "0".to_owned()));
        }
    });

    Ok(excel::load_number_formats(format_indexes, custom_formats, is_1904))
}

/// Reads string content up to `end_tag`, skipping phonetic runs
///
/// # Arguments
/// * `reader` - XML reader positioned just after the opening tag
/// * `end_tag` - XML tag that marks the end of the string content
/// * `is_text_content` - Whether text is collected before any `<t>` element opens
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, SheetMapperError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => push_reference(&mut text, &event)?,
    });
    Ok(text)
}
