//! Conversion of cell text into the declared types of record fields.

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;

/// A type a record field can be declared with.
///
/// `text` is `None` for an absent cell. Implementations return a short message on
/// failure; the caller attaches the cell reference and field name.
pub trait FromCell: Sized {
    fn from_cell(text: Option<&str>) -> Result<Self, String>;
}

/// Trimmed text of a cell that must hold a value.
fn required(text: Option<&str>) -> Result<&str, String> {
    match text.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err("empty cell".to_owned()),
    }
}

macro_rules! from_cell_by_parse {
    ($($ty:ty),*) => {
        $(
            impl FromCell for $ty {
                fn from_cell(text: Option<&str>) -> Result<Self, String> {
                    let text = required(text)?;
                    text.parse::<$ty>()
                        .map_err(|_| format!("parse '{}' to {} failed", text, stringify!($ty)))
                }
            }
        )*
    };
}

from_cell_by_parse!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl FromCell for String {
    fn from_cell(text: Option<&str>) -> Result<Self, String> {
        Ok(text.unwrap_or_default().to_owned())
    }
}

impl FromCell for bool {
    fn from_cell(text: Option<&str>) -> Result<Self, String> {
        let text = required(text)?;
        match text.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(format!("parse '{}' to bool failed", text)),
        }
    }
}

impl FromCell for char {
    fn from_cell(text: Option<&str>) -> Result<Self, String> {
        let text = required(text)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(character), None) => Ok(character),
            _ => Err(format!("parse '{}' to char failed", text)),
        }
    }
}

impl FromCell for NaiveDate {
    fn from_cell(text: Option<&str>) -> Result<Self, String> {
        let text = required(text)?;
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .or_else(|_| NaiveDateTime::from_cell(Some(text)).map(|datetime| datetime.date()))
            .map_err(|_| format!("parse '{}' to NaiveDate failed", text))
    }
}

impl FromCell for NaiveTime {
    fn from_cell(text: Option<&str>) -> Result<Self, String> {
        let text = required(text)?;
        NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .map_err(|_| format!("parse '{}' to NaiveTime failed", text))
    }
}

impl FromCell for NaiveDateTime {
    fn from_cell(text: Option<&str>) -> Result<Self, String> {
        let text = required(text)?;
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
            .or_else(|_| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
            .map_err(|_| format!("parse '{}' to NaiveDateTime failed", text))
    }
}

/// Nullable fields: blank text becomes `None`, anything else is coerced into the
/// underlying type.
impl<T: FromCell> FromCell for Option<T> {
    fn from_cell(text: Option<&str>) -> Result<Self, String> {
        match text {
            Some(text) if !text.trim().is_empty() => T::from_cell(Some(text)).map(Some),
            _ => Ok(None),
        }
    }
}
