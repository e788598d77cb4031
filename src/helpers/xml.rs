//! XML parsing utilities for the Office Open XML parts of a workbook
//! Provides an event reader wrapper and helper traits for attributes and text

use crate::error::SheetMapperError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/// Errors specific to XML parsing operations
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),

    #[error("Parse attribute value '{0}' failed")]
    ParseAttributeValueError(String),
}

/// XML reader wrapper configured for workbook parts
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Reads the next XML event, `None` once the document is exhausted
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, SheetMapperError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(SheetMapperError::XmlError(error)),
        }
    }
}

/// Unescaped value of a single attribute
pub(crate) fn attribute_value<'a>(attribute: &Attribute<'a>) -> Result<Cow<'a, str>, SheetMapperError> {
    Ok(attribute.unescape_value()?)
}

/// Helper trait for start tags providing attribute lookup by name
pub(crate) trait XmlNodeHelper<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetMapperError>;

    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, SheetMapperError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetMapperError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute_value(&attribute))
            .transpose()
    }

    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, SheetMapperError> {
        match self.get_attribute_value(name)? {
            Some(value) => value
                .parse::<T>()
                .map(Some)
                .map_err(|_| XmlError::ParseAttributeValueError(value.to_string()).into()),
            None => Ok(None),
        }
    }
}

/// Appends the character an entity or character reference stands for
pub(crate) fn push_reference(text: &mut String, bytes: &BytesRef) -> Result<(), SheetMapperError> {
    let raw = bytes.xml_content()?;
    if let Some(number) = raw.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16)?,
            None => number.parse::<u32>()?,
        };
        if let Some(character) = char::from_u32(code) {
            text.push(character);
        }
    } else if let Some(entity) = resolve_xml_entity(&raw) {
        text.push_str(entity);
    } else {
        Err(XmlError::ParseEntityError(raw.to_string()))?;
    }
    Ok(())
}

/// Loops over the events of an `XmlReader`, dispatching to the given match arms
/// and ignoring every event no arm accepts.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_attributes_and_references() {
        let xml = r#"<c r="B2" s="3"><v>Fish &amp; Chips &#x41;&#66;</v></c>"#;
        let mut reader = XmlReader::new(Cursor::new(xml.as_bytes()));
        let mut reference = None;
        let mut style = None;
        let mut text = String::new();
        let result: Result<(), SheetMapperError> = (|| {
            match_xml_events!(reader => {
                Event::Start(event) if event.name().as_ref() == b"c" => {
                    reference = event.get_attribute_value("r")?.map(|value| value.to_string());
                    style = event.parse_attribute_value::<usize>("s")?;
                }
                Event::Text(event) => text.push_str(&event.xml_content()?),
                Event::GeneralRef(event) => push_reference(&mut text, &event)?,
            });
            Ok(())
        })();

        assert!(result.is_ok());
        assert_eq!(reference.as_deref(), Some("B2"));
        assert_eq!(style, Some(3));
        assert_eq!(text, "Fish & Chips AB");
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let xml = "<t>&bogus;</t>";
        let mut reader = XmlReader::new(Cursor::new(xml.as_bytes()));
        let mut text = String::new();
        let result: Result<(), SheetMapperError> = (|| {
            match_xml_events!(reader => {
                Event::GeneralRef(event) => push_reference(&mut text, &event)?,
            });
            Ok(())
        })();

        assert!(matches!(
            result,
            Err(SheetMapperError::XmlHelperError(XmlError::ParseEntityError(_)))
        ));
    }
}
