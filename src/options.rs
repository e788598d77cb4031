use crate::mapping::MappingError;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the workbook bytes come from.
#[derive(Clone, Debug)]
pub enum Source {
    /// A workbook file on the local file system
    Path(PathBuf),
    /// A workbook already loaded into memory
    Bytes(Arc<[u8]>),
}

impl Source {
    /// Display name used in error messages and logs.
    pub fn name(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Bytes(bytes) => format!("<memory:{} bytes>", bytes.len()),
        }
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl From<String> for Source {
    fn from(path: String) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(Arc::from(bytes))
    }
}

/// Options controlling how a sheet is mapped to records.
#[derive(Clone, Debug, Default)]
pub struct MappingOptions {
    /// The workbook to read.
    pub source: Option<Source>,

    /// The sheet to read.
    pub sheet_name: Option<String>,

    /// Whether row 0 is a header row, by default it is not.
    /// Name based and implicit mapping need it; index mapping works without.
    pub include_header: bool,

    /// Global ignore case option for header matching.
    pub ignore_case: bool,

    /// Requests write access from the adapter. Read-only adapters ignore it.
    pub editable: bool,
}

impl MappingOptions {
    /// Borrows the source and sheet name, failing on the first one that is missing.
    ///
    /// An empty sheet name counts as missing.
    pub(crate) fn required(&self) -> Result<(&Source, &str), MappingError> {
        let source = self
            .source
            .as_ref()
            .ok_or(MappingError::ConfigurationRequired("source"))?;
        let sheet_name = self
            .sheet_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(MappingError::ConfigurationRequired("sheet_name"))?;
        Ok((source, sheet_name))
    }
}
