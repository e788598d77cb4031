use thiserror::Error;

/// Main error type for the sheet mapper.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum SheetMapperError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Mapping module errors
    #[error("{0}")]
    MappingError(#[from] crate::mapping::MappingError),
}

impl SheetMapperError {
    /// Returns the mapping error if this failure came from column resolution,
    /// configuration validation, or value coercion.
    pub fn as_mapping_error(&self) -> Option<&crate::mapping::MappingError> {
        match self {
            SheetMapperError::MappingError(error) => Some(error),
            _ => None,
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SheetMapperError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| SheetMapperError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingError;

    fn parse_index(text: &str) -> Result<usize, SheetMapperError> {
        Ok(text.parse::<usize>()?)
    }

    #[test]
    fn prefix_keeps_inner_message() {
        let error = parse_index("x").with_prefix("Read sheet 'Orders' failed").unwrap_err();
        assert!(matches!(error, SheetMapperError::WithContextError(_)));
        assert_eq!(
            error.to_string(),
            "Read sheet 'Orders' failed: invalid digit found in string"
        );
        assert_eq!(parse_index("3").with_prefix("unused").unwrap(), 3);
    }

    #[test]
    fn mapping_errors_stay_inspectable() {
        let error = SheetMapperError::from(MappingError::ConfigurationRequired("source"));
        assert_eq!(
            error.as_mapping_error(),
            Some(&MappingError::ConfigurationRequired("source"))
        );
        assert!(SheetMapperError::from(std::io::Error::other("closed"))
            .as_mapping_error()
            .is_none());
    }
}
