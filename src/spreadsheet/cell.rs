use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::SpreadsheetError;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Timelike;

/// Types of cell data in workbook files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as 1/0
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error literals such as `#N/A`
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => {
                Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 })
            }
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Literal text, escapes and bracketed sections (colors, locales) are skipped.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }

    fn is_1904(&self) -> bool {
        matches!(
            self,
            Self::NumberDateTime1904 | Self::NumberDate1904 | Self::NumberTime1904
        )
    }
}

/// A single cell read from a worksheet, before its value is rendered to text.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Raw cell value as stored in the worksheet
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Renders the cell the way the workbook displays it.
    /// Shared strings must already be resolved by the caller.
    pub(crate) fn to_text(&self) -> Result<String, SpreadsheetError> {
        let text = match self.kind {
            CellType::Boolean => if self.value.trim() == "1" { "true" } else { "false" }.to_owned(),
            CellType::NumberDate1900 | CellType::NumberDate1904 => {
                self.to_datetime()?.date().format("%Y-%m-%d").to_string()
            }
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                let datetime = self.to_datetime()?;
                if datetime.nanosecond() > 0 {
                    datetime.format("%H:%M:%S%.3f").to_string()
                } else {
                    datetime.format("%H:%M:%S").to_string()
                }
            }
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                let datetime = self.to_datetime()?;
                if datetime.nanosecond() > 0 {
                    datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
                } else {
                    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            CellType::IsoDateTime => self.value.replace('T', " "),
            _ => self.value.to_owned(),
        };
        Ok(text)
    }

    /// Converts a serial date number to a date time, handling the 1900 and 1904 epochs.
    fn to_datetime(&self) -> Result<NaiveDateTime, SpreadsheetError> {
        let serial = self
            .value
            .trim()
            .parse::<f64>()
            .map_err(|_| self.value_error())?;
        let days = serial.trunc() as i64;
        let offset = if self.kind.is_1904() {
            1_462
        } else if days < 60 {
            // Lotus 1-2-3 treats 1900 as a leap year
            1
        } else {
            0
        };
        let milliseconds = (serial.fract() * 86_400_000f64).round() as i64;
        let days = days.checked_add(offset).and_then(Duration::try_days);
        let time = Duration::try_milliseconds(milliseconds);
        NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|epoch| epoch.and_hms_opt(0, 0, 0))
            .zip(days.zip(time))
            .and_then(|(epoch, (days, time))| epoch.checked_add_signed(days)?.checked_add_signed(time))
            .ok_or_else(|| self.value_error())
    }

    fn value_error(&self) -> SpreadsheetError {
        SpreadsheetError::CellValueError(self.reference(), self.value.to_owned())
    }
}
